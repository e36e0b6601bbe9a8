use serde::Deserialize;
use thiserror::Error;

/// Response from the market-chart endpoint
///
/// Prices arrive as `[timestamp_ms, price]` pairs in chronological order.
#[derive(Debug, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<(i64, f64)>,
}

/// Errors from the market-data provider
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network/request error
    #[error("Request error: {0}")]
    Request(String),
    /// Non-success HTTP status from the provider
    #[error("Provider returned HTTP {0}: {1}")]
    Http(u16, String),
    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Deserialization(String),
    /// Millisecond timestamp outside the representable range
    #[error("Unrepresentable timestamp in response: {0}")]
    InvalidTimestamp(i64),
}
