use reqwest::Client as HttpClient;
use tracing::debug;

use super::models::{FetchError, MarketChartResponse};

/// CoinGecko API client for the public market-chart endpoint
pub struct CoinGeckoClient {
    http_client: HttpClient,
    base_url: String,
}

impl CoinGeckoClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.coingecko.com/api/v3";

    /// Create a new CoinGecko API client
    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL.to_string())
    }

    /// Create a new client with custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
        }
    }

    /// GET /coins/{id}/market_chart
    ///
    /// Retrieves raw `[timestamp_ms, price]` pairs covering the requested
    /// lookback window. A single attempt; the caller decides what a failure
    /// means for the run.
    pub async fn market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<Vec<(i64, f64)>, FetchError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, coin_id);

        let response = self
            .http_client
            .get(&url)
            .header("accept", "application/json")
            .query(&[("vs_currency", vs_currency), ("days", &days.to_string())])
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Http(status, body));
        }

        let data: MarketChartResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Deserialization(e.to_string()))?;

        debug!(
            "Fetched {} price points for {}",
            data.prices.len(),
            coin_id
        );

        Ok(data.prices)
    }
}
