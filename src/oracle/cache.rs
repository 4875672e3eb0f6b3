//! Price cache gate
//!
//! Serves the last snapshot while it is younger than the TTL. Once it
//! expires, the request that notices refreshes it synchronously; if that
//! refresh fails the old snapshot is served again, flagged stale. There is
//! no background timer.
//!
//! Refreshes are single-flight: callers that pile up behind an in-progress
//! refresh reuse its outcome instead of starting their own upstream run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::oracle::aggregator::SnapshotProvider;
use crate::oracle::{AggregationError, PriceServiceError};
use crate::types::PriceSnapshot;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Snapshot and its fetch time, always replaced together
#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: Arc<PriceSnapshot>,
    fetched_at: Instant,
}

impl CacheEntry {
    fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }
}

/// What a caller gets back from [`PriceCache::get`]
#[derive(Debug, Clone, PartialEq)]
pub struct PricesView {
    pub snapshot: Arc<PriceSnapshot>,
    /// Served from memory rather than from the run this call triggered
    pub cached: bool,
    /// Whole seconds since the served snapshot was fetched
    pub age_secs: u64,
    /// A refresh was attempted and failed; this is the previous snapshot
    pub stale: bool,
}

#[derive(Debug, Default)]
struct RefreshStats {
    successes: u64,
    failures: u64,
    last_error: Option<AggregationError>,
    last_success_at: Option<DateTime<Utc>>,
    last_failure_at: Option<DateTime<Utc>>,
}

/// Cache state for the health endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CacheStatus {
    pub has_snapshot: bool,
    pub age_secs: Option<u64>,
    pub fresh: bool,
    pub ttl_secs: u64,
    pub refresh_successes: u64,
    pub refresh_failures: u64,
    pub last_error: Option<String>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure_at: Option<DateTime<Utc>>,
}

pub struct PriceCache {
    provider: Arc<dyn SnapshotProvider>,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
    /// Held for the whole duration of a refresh
    refresh_lock: Mutex<()>,
    /// Bumped every time a refresh finishes, after its outcome is recorded
    refresh_seq: AtomicU64,
    stats: RwLock<RefreshStats>,
}

impl PriceCache {
    pub fn new(provider: Arc<dyn SnapshotProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            ttl,
            entry: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            refresh_seq: AtomicU64::new(0),
            stats: RwLock::new(RefreshStats::default()),
        }
    }

    /// Current prices, refreshing first if the cached snapshot has expired
    pub async fn get(&self) -> Result<PricesView, PriceServiceError> {
        if let Some(view) = self.fresh_view().await {
            return Ok(view);
        }

        let seen_seq = self.refresh_seq.load(Ordering::SeqCst);
        let _guard = self.refresh_lock.lock().await;

        // Someone refreshed while we were queued
        if let Some(view) = self.fresh_view().await {
            return Ok(view);
        }
        if self.refresh_seq.load(Ordering::SeqCst) != seen_seq {
            let last_error = self.stats.read().await.last_error.clone();
            if let Some(err) = last_error {
                return self.fallback(err).await;
            }
        }

        let outcome = self.provider.aggregate().await;
        let result = self.commit(outcome).await;
        self.refresh_seq.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn commit(
        &self,
        outcome: Result<PriceSnapshot, AggregationError>,
    ) -> Result<PricesView, PriceServiceError> {
        match outcome {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.entry.write().await = Some(CacheEntry {
                    snapshot: Arc::clone(&snapshot),
                    fetched_at: Instant::now(),
                });

                let mut stats = self.stats.write().await;
                stats.successes += 1;
                stats.last_error = None;
                stats.last_success_at = Some(Utc::now());
                drop(stats);

                tracing::debug!("Price cache refreshed");
                Ok(PricesView {
                    snapshot,
                    cached: false,
                    age_secs: 0,
                    stale: false,
                })
            }
            Err(err) => {
                let mut stats = self.stats.write().await;
                stats.failures += 1;
                stats.last_error = Some(err.clone());
                stats.last_failure_at = Some(Utc::now());
                drop(stats);

                self.fallback(err).await
            }
        }
    }

    /// Serve the previous snapshot as stale, or fail if there never was one
    async fn fallback(&self, err: AggregationError) -> Result<PricesView, PriceServiceError> {
        let entry = self.entry.read().await.clone();
        match entry {
            Some(entry) => {
                let age_secs = entry.age().as_secs();
                tracing::warn!(
                    error = %err,
                    age_secs = age_secs,
                    "Price refresh failed, serving stale snapshot"
                );
                Ok(PricesView {
                    snapshot: entry.snapshot,
                    cached: true,
                    age_secs,
                    stale: true,
                })
            }
            None => {
                tracing::error!(error = %err, "Price refresh failed with nothing cached");
                Err(PriceServiceError::Unavailable(err))
            }
        }
    }

    async fn fresh_view(&self) -> Option<PricesView> {
        let entry = self.entry.read().await;
        let entry = entry.as_ref()?;
        let age = entry.age();
        if age >= self.ttl {
            return None;
        }
        Some(PricesView {
            snapshot: Arc::clone(&entry.snapshot),
            cached: true,
            age_secs: age.as_secs(),
            stale: false,
        })
    }

    pub async fn status(&self) -> CacheStatus {
        let age = self.entry.read().await.as_ref().map(CacheEntry::age);
        let stats = self.stats.read().await;
        CacheStatus {
            has_snapshot: age.is_some(),
            age_secs: age.map(|a| a.as_secs()),
            fresh: age.map(|a| a < self.ttl).unwrap_or(false),
            ttl_secs: self.ttl.as_secs(),
            refresh_successes: stats.successes,
            refresh_failures: stats.failures,
            last_error: stats.last_error.as_ref().map(ToString::to_string),
            last_success_at: stats.last_success_at,
            last_failure_at: stats.last_failure_at,
        }
    }
}
