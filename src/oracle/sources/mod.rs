//! Price source implementations (DexScreener)

mod dexscreener;

pub use dexscreener::{DexScreenerClient, DEXSCREENER_API_URL};

use crate::oracle::FetchError;
use async_trait::async_trait;

/// Trait for upstream quote sources.
///
/// A source performs exactly one GET per call; retries, timeouts and
/// batching are layered on top by the aggregator.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Get the source name
    fn name(&self) -> &'static str;

    /// GET `url` and decode the body as JSON
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}
