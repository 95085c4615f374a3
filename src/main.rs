//! Daily COVID-19 Numbers API server
//!
//! Run with: cargo run --bin covid-dashboard
//!
//! Loads the three feeds once, positions the cursor on the most recent date
//! and serves the dashboard API. A feed that cannot be loaded is fatal.
//!
//! # Configuration
//!
//! Read from `config.toml` (see `covid-dashboard-cli config`), overridden by:
//! - `COVID_DASHBOARD_BASE_URL`: Remote feed location
//! - `COVID_DASHBOARD_DATA_DIR`: Local feed directory (replaces the remote feeds)
//! - `COVID_DASHBOARD_HOST`: Host to bind to (default: 0.0.0.0)
//! - `COVID_DASHBOARD_PORT`: Port to listen on (default: 8050)
//! - `COVID_DASHBOARD_LOG_LEVEL`, `COVID_DASHBOARD_LOG_FORMAT`
//! - `RUST_LOG`: Full filter directive, wins over the configured level

use covid_dashboard::api::{serve, AppState};
use covid_dashboard::config::{Config, LoggingConfig};
use covid_dashboard::view::DashboardSession;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();
    init_tracing(&config.logging);

    tracing::info!("Starting Daily COVID-19 Numbers v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Loading feeds...");
    let dataset = config.data.loader()?.load().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load the feeds");
        e
    })?;
    tracing::info!(
        regions = dataset.region_count(),
        first = %dataset.first_date(),
        last = %dataset.last_date(),
        "Dataset ready"
    );

    let session = DashboardSession::new(dataset, Arc::new(config.chart.clone()))?;
    tracing::info!(date = %session.current_date(), "Cursor positioned");

    serve(AppState::new(session, config.api.clone())).await?;

    tracing::info!("Daily COVID-19 Numbers stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
