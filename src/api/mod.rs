//! Dashboard REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## View
//! - `GET /api/v1/dates` - Available dates and the cursor position
//! - `GET /api/v1/view` - Totals, deltas, map and curve for the cursor
//! - `GET /api/v1/view/:date` - The same for any date
//!
//! ## Cursor
//! - `POST /api/v1/cursor/previous` - Step one day back
//! - `POST /api/v1/cursor/next` - Step one day forward
//! - `PUT /api/v1/cursor` - Jump to a date
//!
//! ## Popover
//! - `GET /api/v1/popover` - Info popover state
//! - `POST /api/v1/popover/toggle` - Toggle it
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /api/v1/ws` - View pushes on every cursor change
//!
//! # Example
//!
//! ```rust,ignore
//! use covid_dashboard::api::{serve, AppState};
//! use covid_dashboard::config::Config;
//! use covid_dashboard::view::DashboardSession;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let dataset = config.data.loader()?.load().await?;
//!     let session = DashboardSession::new(dataset, Arc::new(config.chart.clone()))?;
//!
//!     serve(AppState::new(session, config.api.clone())).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::websocket::{forward_view_updates, websocket_handler};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // View routes
        .route("/dates", get(routes::view::list_dates))
        .route("/view", get(routes::view::current_view))
        .route("/view/:date", get(routes::view::view_for_date))
        // Cursor routes
        .route("/cursor", put(routes::cursor::set_date))
        .route("/cursor/previous", post(routes::cursor::step_previous))
        .route("/cursor/next", post(routes::cursor::step_next))
        // Popover routes
        .route("/popover", get(routes::popover::get_popover))
        .route("/popover/toggle", post(routes::popover::toggle_popover))
        // WebSocket route
        .route("/ws", get(websocket_handler));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
///
/// Also starts forwarding the session's view updates to WebSocket clients.
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let updates = state.session.lock().await.subscribe();
    let forwarder = forward_view_updates(updates, Arc::clone(&state.ws_hub));

    let addr = state.config.addr();
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Dashboard API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    forwarder.abort();
    tracing::info!("Dashboard API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
