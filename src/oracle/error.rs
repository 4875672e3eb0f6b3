//! Error types for the price pipeline.
//!
//! - [`FetchError`]: one upstream request failed (retried by the caller)
//! - [`AggregationError`]: a whole aggregation run produced nothing usable
//! - [`PriceServiceError`]: the cache gate has no snapshot to serve

use thiserror::Error;

/// Failure of a single upstream request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection, DNS, TLS or other transport-level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request did not complete within the per-request timeout.
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// The upstream answered with a non-success status code.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The body was not valid JSON.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Failure of a complete aggregation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    /// Not a single endpoint yielded a usable quote.
    #[error("No usable quotes: {failed} of {total} endpoints failed")]
    NoUsableQuotes { failed: usize, total: usize },

    /// The endpoint table is empty.
    #[error("No endpoints configured")]
    NoEndpoints,
}

/// Error surfaced by the cache gate when nothing can be served.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceServiceError {
    #[error("Failed to fetch prices: {0}")]
    Unavailable(#[from] AggregationError),
}
