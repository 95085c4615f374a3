//! View Routes
//!
//! - GET /api/v1/dates - Available dates and the cursor position
//! - GET /api/v1/view - The committed view for the cursor
//! - GET /api/v1/view/:date - View for any date, without moving the cursor

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::DatesResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::dataset::parse_date;
use crate::view::DashboardView;

/// GET /api/v1/dates
pub async fn list_dates(State(state): State<Arc<AppState>>) -> Json<DatesResponse> {
    let current = state.session.lock().await.current_date();
    let dataset = &state.dataset;

    Json(DatesResponse {
        dates: dataset.dates().to_vec(),
        first: dataset.first_date(),
        last: dataset.last_date(),
        current,
    })
}

/// GET /api/v1/view
pub async fn current_view(State(state): State<Arc<AppState>>) -> Json<Arc<DashboardView>> {
    Json(state.session.lock().await.view())
}

/// GET /api/v1/view/:date
///
/// Computed straight from the shared dataset; no lock is taken.
pub async fn view_for_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> ApiResult<Json<DashboardView>> {
    let date = parse_date(&date)?;
    let view = DashboardView::compute(&state.dataset, &state.style, date)?;
    Ok(Json(view))
}
