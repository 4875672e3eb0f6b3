//! Oracle Aggregator - Builds one price snapshot from every configured endpoint
//!
//! Endpoints are fetched in fixed-size chunks. Requests inside a chunk run
//! concurrently; chunks run strictly one after another with a short pause in
//! between so the upstream API is never hit with the full endpoint list at
//! once. A failed endpoint only zeroes its own instrument.

use async_trait::async_trait;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::oracle::endpoints::EndpointSpec;
use crate::oracle::normalize;
use crate::oracle::retry::{fetch_with_retry, RetryPolicy};
use crate::oracle::sources::{DexScreenerClient, QuoteSource};
use crate::oracle::AggregationError;
use crate::types::{Instrument, PriceSnapshot};

pub const DEFAULT_CHUNK_SIZE: usize = 4;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(300);

/// Anything that can produce a complete snapshot on demand.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn aggregate(&self) -> Result<PriceSnapshot, AggregationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorSettings {
    /// Price API base URL, endpoint paths are joined onto it
    pub base_url: String,
    /// Endpoints fetched concurrently per chunk
    pub chunk_size: usize,
    /// Pause between consecutive chunks
    pub batch_delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            base_url: crate::oracle::sources::DEXSCREENER_API_URL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            retry: RetryPolicy::default(),
        }
    }
}

/// Per-run bookkeeping, logged after every aggregation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationReport {
    /// Endpoints that produced a usable price
    pub usable: usize,
    /// Endpoints that failed after exhausting retries
    pub failed: Vec<Instrument>,
    /// Endpoints that answered but without a usable price
    pub unusable: Vec<Instrument>,
    pub elapsed: Duration,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub snapshot: PriceSnapshot,
    pub report: AggregationReport,
}

/// Batched price aggregator over a single quote source
pub struct PriceAggregator {
    source: Arc<dyn QuoteSource>,
    endpoints: Vec<EndpointSpec>,
    settings: AggregatorSettings,
}

impl PriceAggregator {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        endpoints: Vec<EndpointSpec>,
        settings: AggregatorSettings,
    ) -> Self {
        Self {
            source,
            endpoints,
            settings,
        }
    }

    /// Aggregator over the live DexScreener API and the built-in endpoint table
    pub fn dexscreener(settings: AggregatorSettings) -> Result<Self, crate::oracle::FetchError> {
        let client = DexScreenerClient::new(settings.retry.request_timeout)?;
        Ok(Self::new(
            Arc::new(client),
            crate::oracle::default_endpoints(),
            settings,
        ))
    }

    pub fn endpoints(&self) -> &[EndpointSpec] {
        &self.endpoints
    }

    /// Run one full aggregation pass
    pub async fn run(&self) -> Result<Aggregation, AggregationError> {
        if self.endpoints.is_empty() {
            return Err(AggregationError::NoEndpoints);
        }

        let started = Instant::now();
        let chunk_size = self.settings.chunk_size.max(1);
        let mut snapshot = PriceSnapshot::default();
        let mut report = AggregationReport::default();

        for (index, chunk) in self.endpoints.chunks(chunk_size).enumerate() {
            if index > 0 && !self.settings.batch_delay.is_zero() {
                tokio::time::sleep(self.settings.batch_delay).await;
            }

            let results = join_all(chunk.iter().map(|spec| async move {
                let url = spec.url(&self.settings.base_url);
                let result = fetch_with_retry(self.source.as_ref(), &url, &self.settings.retry).await;
                (spec, result)
            }))
            .await;

            for (spec, result) in results {
                match result {
                    Ok(body) => Self::apply(spec, &body, &mut snapshot, &mut report),
                    Err(err) => {
                        tracing::warn!(
                            source = %self.source.name(),
                            instrument = %spec.instrument,
                            error = %err,
                            "Price endpoint failed after retries, defaulting to 0"
                        );
                        report.failed.push(spec.instrument);
                    }
                }
            }
        }

        report.elapsed = started.elapsed();

        if report.usable == 0 {
            tracing::error!(
                total = self.endpoints.len(),
                failed = report.failed.len(),
                unusable = report.unusable.len(),
                "Aggregation produced no usable quotes"
            );
            return Err(AggregationError::NoUsableQuotes {
                failed: report.failed.len() + report.unusable.len(),
                total: self.endpoints.len(),
            });
        }

        tracing::info!(
            usable = report.usable,
            failed = report.failed.len(),
            unusable = report.unusable.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Aggregated prices"
        );

        Ok(Aggregation { snapshot, report })
    }

    fn apply(
        spec: &EndpointSpec,
        body: &serde_json::Value,
        snapshot: &mut PriceSnapshot,
        report: &mut AggregationReport,
    ) {
        let quote = normalize::extract(spec, body);

        let stored = quote
            .price
            .map(|price| snapshot.set_price(spec.instrument, price))
            .unwrap_or(false);
        if stored {
            report.usable += 1;
        } else {
            tracing::debug!(instrument = %spec.instrument, "Response carried no usable price");
            report.unusable.push(spec.instrument);
        }

        for field in spec.aux {
            if let Some(value) = quote.aux(*field) {
                snapshot.set_aux(*field, value);
            }
        }
    }
}

#[async_trait]
impl SnapshotProvider for PriceAggregator {
    async fn aggregate(&self) -> Result<PriceSnapshot, AggregationError> {
        self.run().await.map(|aggregation| aggregation.snapshot)
    }
}
