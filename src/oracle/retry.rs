//! Fetch-with-retry
//!
//! Bounded retry around a single upstream GET. Each attempt is capped by a
//! per-request timeout and the delay grows linearly with the attempt number.

use std::time::Duration;

use crate::oracle::sources::QuoteSource;
use crate::oracle::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub retries: u32,
    /// Delay unit; the wait after failed attempt `i` (0-based) is `base_delay * (i + 1)`
    pub base_delay: Duration,
    /// Upper bound for a single attempt
    pub request_timeout: Duration,
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay slept after the failed attempt with index `attempt` (0-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_add(1))
    }

    /// Sum of every backoff delay when all attempts fail
    pub fn total_backoff(&self) -> Duration {
        (0..self.retries).map(|i| self.delay_after(i)).sum()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            base_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_millis(5000),
        }
    }
}

/// GET `url` through `source`, retrying transport failures, timeouts and
/// non-success statuses up to `policy.retries` times.
pub async fn fetch_with_retry<S>(
    source: &S,
    url: &str,
    policy: &RetryPolicy,
) -> Result<serde_json::Value, FetchError>
where
    S: QuoteSource + ?Sized,
{
    let attempts = policy.attempts();
    let mut attempt = 0u32;

    loop {
        let outcome = tokio::time::timeout(policy.request_timeout, source.fetch_json(url))
            .await
            .unwrap_or_else(|_| {
                Err(FetchError::Timeout(
                    policy.request_timeout.as_millis() as u64,
                ))
            });

        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if attempt + 1 >= attempts {
            return Err(err);
        }

        let delay = policy.delay_after(attempt);
        tracing::debug!(
            source = %source.name(),
            url = %url,
            attempt = attempt + 1,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Request failed, retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
