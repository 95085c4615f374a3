//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{DatasetHealth, HealthResponse};
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// The dataset is loaded before the server binds, so a running server is
/// ready as long as it holds at least one date.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.dataset.dates().is_empty() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dataset = &state.dataset;

    Json(HealthResponse {
        status: "healthy".to_string(),
        dataset: DatasetHealth {
            regions: dataset.region_count(),
            dates: dataset.dates().len(),
            first: dataset.first_date(),
            last: dataset.last_date(),
        },
        ws_connections: state.ws_connection_count().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
