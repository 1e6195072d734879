//! Data models for the index tracker
//!
//! Plain records passed between the fetch, preparation, chart and export steps.

pub mod index;
pub mod options;
pub mod ping;
pub mod series;

// Re-export commonly used types for convenience
pub use index::{IndexName, Period};
pub use options::{CsvLayout, DisplayOptions, OptionsError};
pub use ping::PingMetrics;
pub use series::{DataPoint, PreparedSeries, TimeSeries};
