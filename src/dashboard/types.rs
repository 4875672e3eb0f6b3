//! Dashboard API Types
//!
//! DTOs for HTTP communication with the dashboard frontend.

use serde::Serialize;

use crate::oracle::PricesView;
use crate::types::PriceSnapshot;

/// Body of `GET /api/prices`: the flat snapshot plus cache metadata
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PricesResponse {
    #[serde(flatten)]
    pub snapshot: PriceSnapshot,
    pub cached: bool,
    /// Seconds since the snapshot was fetched
    pub age: u64,
    /// Only present when a refresh failed and an old snapshot is served
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
}

impl From<PricesView> for PricesResponse {
    fn from(view: PricesView) -> Self {
        Self {
            snapshot: PriceSnapshot::clone(&view.snapshot),
            cached: view.cached,
            age: view.age_secs,
            stale: view.stale,
        }
    }
}

/// Body of every 5xx from the price endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// API response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}
