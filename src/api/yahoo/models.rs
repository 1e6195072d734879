use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{DataPoint, TimeSeries};

/// Top level body of the v8 chart endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartErrorBody>,
}

/// Error object Yahoo embeds in an otherwise well-formed body
#[derive(Debug, Clone, Deserialize)]
pub struct ChartErrorBody {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: Option<ChartMeta>,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartMeta {
    /// Exchange offset from UTC in seconds
    pub gmtoffset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// Failures of the data fetch layer
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Rate Limited by quote provider")]
    RateLimited,
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    #[error("Request Error: {0}")]
    RequestError(String),
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
    #[error("Quote provider error: {0}")]
    Api(String),
    #[error("No chart data returned")]
    NoData,
}

impl ChartResult {
    /// Daily closes keyed by exchange-local calendar date.
    /// Rows without a close are dropped.
    pub fn into_series(self) -> TimeSeries {
        let offset = self.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
        let closes = self
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default();

        let points = self
            .timestamp
            .iter()
            .zip(closes)
            .filter_map(|(&ts, close)| {
                let value = close.filter(|v| v.is_finite())?;
                let date = exchange_date(ts, offset)?;
                Some(DataPoint::new(date, value))
            })
            .collect();

        TimeSeries::from_points(points)
    }
}

fn exchange_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

/// Parse a chart endpoint body into a series of daily closes
pub fn parse_chart_response(body: &str) -> Result<TimeSeries, FetchError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::DeserializationError(format!("Failed to parse response: {}", e)))?;

    if let Some(err) = response.chart.error {
        let description = err
            .description
            .or(err.code)
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(FetchError::Api(description));
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| results.pop())
        .ok_or(FetchError::NoData)?;

    Ok(result.into_series())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NIFTY_BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "^NSEI", "gmtoffset": 19800 },
                "timestamp": [1704166200, 1704252600, 1704339000],
                "indicators": {
                    "quote": [{ "close": [21665.8, null, 21517.35] }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_drops_missing_closes() {
        let series = parse_chart_response(NIFTY_BODY).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(series.points()[0].value, 21665.8);
        assert_eq!(series.points()[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn test_parse_uses_exchange_offset() {
        // 2024-01-01 20:00 UTC is already Jan 2 in IST
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":19800},
            "timestamp":[1704139200],"indicators":{"quote":[{"close":[1.0]}]}}],"error":null}}"#;
        let series = parse_chart_response(body).unwrap();
        assert_eq!(series.points()[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        match parse_chart_response(body) {
            Err(FetchError::Api(msg)) => assert!(msg.contains("delisted")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_without_timestamps_is_empty() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":19800},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let series = parse_chart_response(body).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_chart_response("<html>"),
            Err(FetchError::DeserializationError(_))
        ));
        assert!(matches!(
            parse_chart_response(r#"{"chart":{"result":[],"error":null}}"#),
            Err(FetchError::NoData)
        ));
    }
}
