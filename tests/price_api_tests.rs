//! HTTP tests for the dashboard price API

#[cfg(feature = "dashboard")]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tower::ServiceExt;

    use tokenboard::dashboard::{create_router, DashboardState};
    use tokenboard::oracle::{AggregationError, PriceCache, SnapshotProvider, DEFAULT_TTL};
    use tokenboard::types::{AuxField, Instrument, PriceSnapshot};

    /// Plays back a fixed list of outcomes, one per aggregation
    struct ScriptedProvider {
        outcomes: Mutex<VecDeque<Result<PriceSnapshot, AggregationError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(outcomes: Vec<Result<PriceSnapshot, AggregationError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SnapshotProvider for ScriptedProvider {
        async fn aggregate(&self) -> Result<PriceSnapshot, AggregationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .ok()
                .and_then(|mut q| q.pop_front())
                .unwrap_or(Err(AggregationError::NoEndpoints))
        }
    }

    fn sample_snapshot() -> PriceSnapshot {
        let mut snapshot = PriceSnapshot::default();
        snapshot.set_price(Instrument::PLS, 0.0000412);
        snapshot.set_price(Instrument::INC, 1.37);
        snapshot.set_aux(AuxField::MarketCap, 2_400_000.0);
        snapshot.set_aux(AuxField::Liquidity, 310_000.0);
        snapshot
    }

    fn outage() -> AggregationError {
        AggregationError::NoUsableQuotes {
            failed: 15,
            total: 15,
        }
    }

    fn router(provider: Arc<ScriptedProvider>) -> Router {
        let cache = Arc::new(PriceCache::new(provider, DEFAULT_TTL));
        create_router(DashboardState::new(cache))
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("valid request"),
            )
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let json = serde_json::from_slice(&bytes).expect("json body");
        (status, json)
    }

    #[tokio::test(start_paused = true)]
    async fn prices_are_flat_and_fully_populated() {
        let provider = ScriptedProvider::new(vec![Ok(sample_snapshot())]);
        let app = router(provider.clone());

        let (status, body) = get_json(&app, "/api/prices").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cached"], false);
        assert_eq!(body["age"], 0);
        assert!(body.get("stale").is_none());
        assert_eq!(body["plsPrice"], 0.0000412);
        assert_eq!(body["incPrice"], 1.37);
        assert_eq!(body["incMarketCap"], 2_400_000.0);
        assert_eq!(body["incLiquidity"], 310_000.0);

        for instrument in Instrument::ALL {
            let value = body[instrument.price_field()]
                .as_f64()
                .unwrap_or_else(|| panic!("{} missing", instrument.price_field()));
            assert!(value.is_finite() && value >= 0.0);
        }
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn second_request_within_ttl_is_cached() {
        let provider = ScriptedProvider::new(vec![Ok(sample_snapshot())]);
        let app = router(provider.clone());

        get_json(&app, "/api/prices").await;
        tokio::time::advance(Duration::from_secs(30)).await;
        let (status, body) = get_json(&app, "/api/prices").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cached"], true);
        assert_eq!(body["age"], 30);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_returns_stale_snapshot() {
        let provider = ScriptedProvider::new(vec![Ok(sample_snapshot()), Err(outage())]);
        let app = router(provider.clone());

        get_json(&app, "/api/prices").await;
        tokio::time::advance(Duration::from_secs(61)).await;
        let (status, body) = get_json(&app, "/api/prices").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cached"], true);
        assert_eq!(body["stale"], true);
        assert!(body["age"].as_u64().unwrap_or_default() >= 61);
        assert_eq!(body["incPrice"], 1.37);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cold_failure_is_a_500_with_error_body() {
        let provider = ScriptedProvider::new(vec![Err(outage())]);
        let app = router(provider);

        let (status, body) = get_json(&app, "/api/prices").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let obj = body.as_object().expect("object body");
        assert_eq!(obj.len(), 1);
        assert!(obj["error"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Failed to fetch prices"));
    }

    #[tokio::test(start_paused = true)]
    async fn health_reports_cache_state() {
        let provider = ScriptedProvider::new(vec![Ok(sample_snapshot())]);
        let app = router(provider);

        let (_, before) = get_json(&app, "/api/health").await;
        assert_eq!(before["success"], true);
        assert_eq!(before["data"]["has_snapshot"], false);
        assert_eq!(before["data"]["ttl_secs"], 60);

        get_json(&app, "/api/prices").await;
        tokio::time::advance(Duration::from_secs(10)).await;

        let (status, after) = get_json(&app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(after["data"]["has_snapshot"], true);
        assert_eq!(after["data"]["fresh"], true);
        assert_eq!(after["data"]["age_secs"], 10);
        assert_eq!(after["data"]["refresh_successes"], 1);
    }
}
