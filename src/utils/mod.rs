pub mod config;
pub mod errors;
pub mod table;

pub use config::Config;
pub use errors::{extract_clean_error, TrackerError};
