//! Dashboard HTTP API
//!
//! REST endpoints for the dashboard frontend.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::types::*;
use super::DashboardState;
use crate::oracle::PriceServiceError;

/// Create the API router with all endpoints
pub fn create_router(state: DashboardState) -> Router {
    Router::new()
        .route("/api/prices", get(get_prices))
        .route("/api/health", get(get_health))
        .with_state(state)
        // CORS for frontend
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

// ─────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────

/// GET /api/prices - Flat price snapshot with cache metadata
async fn get_prices(
    State(state): State<DashboardState>,
) -> Result<Json<PricesResponse>, PriceServiceError> {
    let view = state.prices.get().await?;
    Ok(Json(PricesResponse::from(view)))
}

/// GET /api/health - Cache freshness and refresh counters
async fn get_health(State(state): State<DashboardState>) -> impl IntoResponse {
    let status = state.prices.status().await;
    Json(ApiResponse::success(status))
}

impl IntoResponse for PriceServiceError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
