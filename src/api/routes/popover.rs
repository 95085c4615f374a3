//! Popover Routes
//!
//! - GET /api/v1/popover - Whether the map's info popover is open
//! - POST /api/v1/popover/toggle - Open it if closed, close it if open

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::PopoverResponse;
use crate::api::state::AppState;

/// GET /api/v1/popover
pub async fn get_popover(State(state): State<Arc<AppState>>) -> Json<PopoverResponse> {
    let is_open = state.session.lock().await.popover_open();
    Json(PopoverResponse { is_open })
}

/// POST /api/v1/popover/toggle
pub async fn toggle_popover(State(state): State<Arc<AppState>>) -> Json<PopoverResponse> {
    let is_open = state.session.lock().await.toggle_popover();
    Json(PopoverResponse { is_open })
}
