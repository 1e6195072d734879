use std::time::{Duration, Instant};

use serenity::builder::CreateEmbed;
use tracing::warn;

use crate::api::yahoo::YahooClient;
use crate::models::PingMetrics;

/// Collect bot latency, uptime and quote provider reachability
pub async fn get_ping_metrics(
    yahoo: &YahooClient,
    bot_start_time: Option<Instant>,
    roundtrip: Duration,
) -> PingMetrics {
    let data_source_latency = match yahoo.ping().await {
        Ok(latency) => Some(latency.as_millis() as u64),
        Err(e) => {
            warn!("Quote provider unreachable: {}", e);
            None
        }
    };

    PingMetrics {
        response_roundtrip: roundtrip.as_millis() as u64,
        uptime: bot_start_time
            .map(|start| format_uptime(start.elapsed()))
            .unwrap_or_else(|| "Unknown".to_string()),
        data_source_latency,
    }
}

pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

pub fn create_ping_embed(metrics: &PingMetrics) -> CreateEmbed {
    let data_source = match metrics.data_source_latency {
        Some(ms) => format!("{}ms", ms),
        None => "unreachable".to_string(),
    };

    CreateEmbed::default()
        .title("Pong! 🏓")
        .field("Response Roundtrip", format!("{}ms", metrics.response_roundtrip), true)
        .field("Quote Provider", data_source, true)
        .field("Uptime", &metrics.uptime, false)
        .color(0x00b0f4)
}
