//! Dashboard Module
//!
//! HTTP API consumed by the wallet dashboard frontend.
//! Only compiled when the `dashboard` feature is enabled.

mod api;
mod types;

pub use api::create_router;
pub use types::*;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::oracle::PriceCache;

/// Shared handler state, cloned into every request
#[derive(Clone)]
pub struct DashboardState {
    pub prices: Arc<PriceCache>,
}

impl DashboardState {
    pub fn new(prices: Arc<PriceCache>) -> Self {
        Self { prices }
    }
}

/// Start the dashboard server and run until ctrl-c
pub async fn start_server(state: DashboardState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);

    tracing::info!("Dashboard API starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Dashboard API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
