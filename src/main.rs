//! Tokenboard dashboard API server

use std::sync::Arc;

use anyhow::Context;
use tokenboard::config::AppConfig;
use tokenboard::dashboard::{self, DashboardState};
use tokenboard::logging::init_tracing;
use tokenboard::oracle::{PriceAggregator, PriceCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Tokenboard");
    tracing::info!("Config: {}", config);

    let aggregator = PriceAggregator::dexscreener(config.prices.aggregator_settings())
        .context("Failed to create price aggregator")?;
    tracing::info!(
        endpoints = aggregator.endpoints().len(),
        "Price aggregator ready"
    );

    let cache = Arc::new(PriceCache::new(Arc::new(aggregator), config.prices.ttl()));
    let addr = config.listen_addr()?;

    dashboard::start_server(DashboardState::new(cache), addr).await
}
