//! Process-wide configuration
//!
//! Everything except the GitHub token is a fixed constant baked into the
//! config struct; the token is the only value read from the environment.
//! Each pipeline stage receives the config by reference so it can be
//! constructed directly in tests.

use chrono::FixedOffset;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
}

/// Immutable configuration passed into each pipeline stage
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// CoinGecko coin id of the tracked asset
    pub coin_id: String,
    /// Ticker symbol used in chart captions and log lines
    pub asset_symbol: String,
    /// Quote currency for the market-chart request
    pub vs_currency: String,
    /// How many days of history to request per run
    pub lookback_days: u32,
    /// Owner of the repository the chart is published to
    pub github_owner: String,
    /// Repository name
    pub github_repo: String,
    /// Branch that receives the chart commits
    pub github_branch: String,
    /// Path of the chart file inside the repository
    pub remote_path: String,
    /// Logical filename of the rendered artifact
    pub output_filename: String,
    /// Fixed offset all displayed timestamps are converted to
    pub display_offset: FixedOffset,
    /// Short label of the display timezone, used in captions
    pub tz_label: String,
    /// Chart width in pixels
    pub chart_width: u32,
    /// Chart height in pixels
    pub chart_height: u32,
    /// GitHub API token
    pub github_token: String,
}

impl AppConfig {
    /// Build the configuration, reading the GitHub token from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let github_token = std::env::var("GITHUB_TOKEN")
            .map_err(|_| ConfigError::MissingVar("GITHUB_TOKEN".to_string()))?;
        Ok(Self::with_token(github_token))
    }

    /// Build the configuration with an explicit token
    pub fn with_token(github_token: String) -> Self {
        // Asia/Singapore is UTC+8 year-round, so a fixed offset is enough
        let display_offset = FixedOffset::east_opt(8 * 3600).expect("valid UTC offset");

        Self {
            coin_id: "polkadot".to_string(),
            asset_symbol: "DOT".to_string(),
            vs_currency: "usd".to_string(),
            lookback_days: 2,
            github_owner: "jkwfung87".to_string(),
            github_repo: "dotbot-charts".to_string(),
            github_branch: "main".to_string(),
            remote_path: "charts/dot_chart.png".to_string(),
            output_filename: "dot_chart.png".to_string(),
            display_offset,
            tz_label: "SGT".to_string(),
            chart_width: 1000,
            chart_height: 600,
            github_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_are_consistent() {
        let config = AppConfig::with_token("test_token".to_string());

        assert!(config.lookback_days >= 1, "Should request at least 1 day");
        assert!(config.chart_width > 0 && config.chart_height > 0);
        assert!(
            config.remote_path.ends_with(&config.output_filename),
            "Remote path should point at the output file"
        );
        assert_eq!(config.display_offset.local_minus_utc(), 8 * 3600);
    }
}
