use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::models::{parse_chart_response, FetchError};
use crate::models::TimeSeries;

/// Yahoo Finance client for daily index closes
#[derive(Clone)]
pub struct YahooClient {
    http_client: HttpClient,
    base_url: String,
}

impl YahooClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com";
    const BROWSER_USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a client against `base_url`, normally [`Self::DEFAULT_BASE_URL`]
    pub fn with_base_url(base_url: String) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(Self::BROWSER_USER_AGENT));

        let http_client = HttpClient::builder()
            .timeout(Self::TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol.replace('^', "%5E"))
    }

    /// Map a non-success status to a fetch error
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> FetchError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            404 => FetchError::NotFound(body_text),
            429 => {
                warn!("Rate limited by quote provider");
                FetchError::RateLimited
            }
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                FetchError::ServerError(status_code, body_text)
            }
            _ => FetchError::HttpError(status_code, body_text),
        }
    }

    /// GET /v8/finance/chart/{symbol}
    ///
    /// Fetches daily closes covering the last `days` calendar days.
    ///
    /// # Arguments
    /// * `symbol` - Yahoo symbol, e.g. `^NSEI`
    /// * `days` - Lookback range in days
    ///
    /// # Returns
    /// * `Ok(TimeSeries)` - Closes oldest first, possibly empty
    /// * `Err(FetchError)` - Network, HTTP or parse failure
    pub async fn get_daily_closes(&self, symbol: &str, days: usize) -> Result<TimeSeries, FetchError> {
        let url = self.chart_url(symbol);
        let range = format!("{}d", days);
        debug!("Fetching {} range={} from {}", symbol, range, url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("range", range.as_str()), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| FetchError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::RequestError(format!("Failed to read response: {}", e)))?;

        let series = parse_chart_response(&body)?;
        debug!("Fetched {} daily closes for {}", series.len(), symbol);
        Ok(series)
    }

    /// Time a lightweight request to the provider
    pub async fn ping(&self) -> Result<Duration, FetchError> {
        let start = Instant::now();
        self.http_client
            .head(&self.base_url)
            .send()
            .await
            .map_err(|e| FetchError::RequestError(format!("Request failed: {}", e)))?;
        Ok(start.elapsed())
    }
}
