//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::charts::ChartStyle;
use crate::config::ApiConfig;
use crate::dataset::Dataset;
use crate::view::DashboardSession;
use crate::websocket::{ConnectionHub, HubConfig};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable dataset, read without locking
    pub dataset: Arc<Dataset>,
    /// Chart theme
    pub style: Arc<ChartStyle>,
    /// The one cursor session
    pub session: Arc<Mutex<DashboardSession>>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// WebSocket connection hub for view pushes
    pub ws_hub: Arc<ConnectionHub>,
}

impl AppState {
    pub fn new(session: DashboardSession, config: ApiConfig) -> Self {
        let hub_config = HubConfig {
            max_connections: config.max_ws_connections,
        };

        Self {
            dataset: Arc::clone(session.dataset()),
            style: Arc::clone(session.style()),
            session: Arc::new(Mutex::new(session)),
            config: Arc::new(config),
            start_time: Instant::now(),
            ws_hub: Arc::new(ConnectionHub::new(hub_config)),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get WebSocket connection count
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }
}
