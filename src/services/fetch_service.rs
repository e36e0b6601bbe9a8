//! Price-history retrieval
//!
//! One attempt per run. A failure here is not fatal: the caller logs it and
//! treats the run as having no data.

use chrono::DateTime;
use tracing::{debug, info};

use crate::api::coingecko::{CoinGeckoClient, FetchError};
use crate::config::AppConfig;
use crate::models::PriceSample;

/// Fetch the configured lookback window of price samples
///
/// Returns samples in chronological order. An `Ok` empty series is a valid
/// "skip this run" signal, not an error.
pub async fn fetch_price_history(
    config: &AppConfig,
    client: &CoinGeckoClient,
) -> Result<Vec<PriceSample>, FetchError> {
    info!(
        "Fetching {} days of {} prices from CoinGecko...",
        config.lookback_days, config.coin_id
    );

    let prices = client
        .market_chart(&config.coin_id, &config.vs_currency, config.lookback_days)
        .await?;

    let samples = to_samples(prices)?;

    debug!("Fetched {} samples", samples.len());

    Ok(samples)
}

/// Convert raw `[timestamp_ms, price]` pairs into price samples
fn to_samples(prices: Vec<(i64, f64)>) -> Result<Vec<PriceSample>, FetchError> {
    let mut samples = Vec::with_capacity(prices.len());

    for (timestamp_ms, price) in prices {
        let timestamp = DateTime::from_timestamp_millis(timestamp_ms)
            .ok_or(FetchError::InvalidTimestamp(timestamp_ms))?;
        samples.push(PriceSample { timestamp, price });
    }

    // Should already be chronological from the provider, but ensure it since
    // the candle pairing depends on input order
    samples.sort_by_key(|s| s.timestamp);

    Ok(samples)
}
