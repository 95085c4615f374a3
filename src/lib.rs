//! # Daily COVID-19 Numbers
//!
//! Date-cursor-driven dashboard over the confirmed, deaths and recovered
//! time-series feeds: daily totals, day-over-day changes, a bubble map of
//! confirmed cases and the cumulative curves, recomputed whenever the
//! selected date moves.
//!
//! ## Modules
//!
//! - [`dataset`]: feed loading and the immutable three-table dataset
//! - [`cursor`]: the selected date, clamped to the known range
//! - [`aggregate`]: totals, deltas and cumulative series
//! - [`charts`]: map and curve figure specifications
//! - [`view`]: the session binding cursor changes to recomputation
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: view pushes to connected dashboards
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use covid_dashboard::{ChartStyle, DashboardSession, DatasetLoader, Direction, HttpFeedSource};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpFeedSource::new(
//!         covid_dashboard::dataset::DEFAULT_BASE_URL,
//!         Duration::from_secs(30),
//!     )?;
//!     let dataset = DatasetLoader::new(source).load().await?;
//!
//!     let mut session = DashboardSession::new(dataset, Arc::new(ChartStyle::default()))?;
//!     let view = session.step(Direction::Previous)?;
//!
//!     println!("{}: {} confirmed ({})", view.date, view.cards[0].total, view.cards[0].change);
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod api;
pub mod charts;
pub mod config;
pub mod cursor;
pub mod dataset;
pub mod view;
pub mod websocket;

// Re-export top-level types for convenience
pub use dataset::{
    Category, Dataset, DatasetError, DatasetLoader, DatasetResult, FeedSource, FileFeedSource,
    HttpFeedSource, PerCategory,
};

pub use cursor::{CursorError, DateCursor, Direction};

pub use aggregate::{format_count, format_delta, Aggregator, CategoryCounts, CumulativeSeries};

pub use charts::{ChartBuilder, ChartStyle, CurveSpec, MapSpec};

pub use view::{DashboardSession, DashboardView, ViewError, ViewUpdate};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError};
