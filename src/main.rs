use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod services;

use api::coingecko::CoinGeckoClient;
use api::github::GitHubClient;
use config::AppConfig;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("candlecast=info".parse().unwrap()),
        )
        .with_target(true)
        .init();

    info!("📈 Starting candlecast...");

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    let coingecko = CoinGeckoClient::new();
    let github = match GitHubClient::new(config.github_token.clone()) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create GitHub client: {}", e);
            return;
        }
    };

    // Fetch. A failed or empty fetch ends the run normally; the next
    // scheduled invocation simply tries again.
    let samples = match services::fetch_service::fetch_price_history(&config, &coingecko).await {
        Ok(samples) => samples,
        Err(e) => {
            error!("❌ Error fetching {} data: {}", config.asset_symbol, e);
            info!("📉 No data fetched. Chart generation skipped.");
            return;
        }
    };

    if samples.is_empty() {
        info!("📉 No data fetched. Chart generation skipped.");
        return;
    }

    // Render
    let artifact = match services::chart_service::render_chart(&config, &samples) {
        Ok(artifact) => artifact,
        Err(e) => {
            warn!("❌ {}. Chart generation skipped.", e);
            return;
        }
    };
    info!(
        "✅ Chart rendered: {} ({} bytes)",
        artifact.filename,
        artifact.bytes.len()
    );

    // Publish. Fire-and-forget: a failure is logged and the run still ends
    // normally, with no local fallback storage.
    match services::publish_service::publish_chart(&config, &github, &artifact).await {
        Ok(outcome) => {
            info!(
                "✅ Chart uploaded to GitHub ({}, commit {})",
                if outcome.replaced { "updated" } else { "created" },
                outcome.commit_sha
            );
        }
        Err(e) => error!("❌ Upload failed: {}", e),
    }
}
