//! Cursor Routes
//!
//! The navigation controls. Each returns the view committed for the new
//! cursor position; subscribed WebSocket clients receive the same view.
//!
//! - POST /api/v1/cursor/previous - One day back (no-op at the first date)
//! - POST /api/v1/cursor/next - One day forward (no-op at the last date)
//! - PUT /api/v1/cursor - Jump to a date

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::SetCursorRequest;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::cursor::Direction;
use crate::view::DashboardView;

/// POST /api/v1/cursor/previous
pub async fn step_previous(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Arc<DashboardView>>> {
    step(&state, Direction::Previous).await
}

/// POST /api/v1/cursor/next
pub async fn step_next(State(state): State<Arc<AppState>>) -> ApiResult<Json<Arc<DashboardView>>> {
    step(&state, Direction::Next).await
}

/// PUT /api/v1/cursor
pub async fn set_date(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetCursorRequest>,
) -> ApiResult<Json<Arc<DashboardView>>> {
    let view = state.session.lock().await.set_str(&req.date)?;
    tracing::info!(date = %view.date, "Cursor set");
    Ok(Json(view))
}

async fn step(state: &AppState, direction: Direction) -> ApiResult<Json<Arc<DashboardView>>> {
    let view = state.session.lock().await.step(direction)?;
    tracing::debug!(date = %view.date, ?direction, "Cursor stepped");
    Ok(Json(view))
}
