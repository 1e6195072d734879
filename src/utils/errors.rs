use thiserror::Error;

use crate::api::yahoo::FetchError;
use crate::models::OptionsError;
use crate::services::chart_service::ChartError;
use crate::services::export_service::ExportError;
use crate::services::series_service::PrepareError;

/// Anything that can end a render cycle early
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Prepare(#[from] PrepareError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl TrackerError {
    /// Message shown to the Discord user.
    ///
    /// Fetch failures are collapsed into a generic retry hint; the detail
    /// only goes to the logs.
    pub fn user_message(&self) -> String {
        match self {
            TrackerError::Options(e) => format!("❌ {}", e),
            TrackerError::Fetch(FetchError::RateLimited) => {
                "⚠️ **Rate Limited**: the quote provider is throttling us. Please try again in a moment.".to_string()
            }
            TrackerError::Fetch(_) => {
                "⚠️ **Data Unavailable**: could not fetch index data right now. Please try again.".to_string()
            }
            TrackerError::Prepare(e) => format!("❌ {}", e),
            TrackerError::Chart(e) => format!("❌ Chart generation failed: {}", e),
            TrackerError::Export(e) => format!("❌ CSV export failed: {}", e),
        }
    }
}

/// Strip transport prefixes from a Discord error string.
///
/// "HTTP error: Request failed: Missing Permissions" becomes "Missing Permissions".
pub fn extract_clean_error(error_msg: &str) -> String {
    match error_msg.rfind(": ") {
        Some(last_colon) if error_msg.starts_with("HTTP") => error_msg[last_colon + 2..].trim().to_string(),
        _ => error_msg.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndexName;

    #[test]
    fn test_fetch_errors_are_generic() {
        let err = TrackerError::from(FetchError::ServerError(503, "upstream down".to_string()));
        let message = err.user_message();
        assert!(message.contains("try again"));
        assert!(!message.contains("upstream down"));
    }

    #[test]
    fn test_prepare_errors_name_the_index() {
        let err = TrackerError::from(PrepareError::MissingIndexData(IndexName::BankNifty));
        assert_eq!(err.user_message(), "❌ No data available for BANKNIFTY");
    }

    #[test]
    fn test_extract_clean_error() {
        assert_eq!(
            extract_clean_error("HTTP error: Request failed: Missing Permissions"),
            "Missing Permissions"
        );
        assert_eq!(extract_clean_error("plain message"), "plain message");
    }
}
