//! Oracle module - Cached multi-endpoint price aggregation
//!
//! Fetches USD quotes for every tracked instrument from DexScreener in
//! throttled batches, normalizes them into one [`PriceSnapshot`], and puts a
//! TTL cache with stale fallback in front of the whole pipeline.
//!
//! [`PriceSnapshot`]: crate::types::PriceSnapshot

mod aggregator;
mod cache;
mod endpoints;
mod error;
pub mod normalize;
pub mod retry;
pub mod sources;

pub use aggregator::{
    Aggregation, AggregationReport, AggregatorSettings, PriceAggregator, SnapshotProvider,
    DEFAULT_BATCH_DELAY, DEFAULT_CHUNK_SIZE,
};
pub use cache::{CacheStatus, PriceCache, PricesView, DEFAULT_TTL};
pub use endpoints::{default_endpoints, EndpointSpec, ResponseShape};
pub use error::{AggregationError, FetchError, PriceServiceError};
pub use retry::RetryPolicy;
