//! Ping/status command models

/// Bot latency, uptime and data source reachability
#[derive(Debug)]
pub struct PingMetrics {
    pub response_roundtrip: u64,
    pub uptime: String,
    /// Round trip to the quote provider; `None` when it could not be reached
    pub data_source_latency: Option<u64>,
}
