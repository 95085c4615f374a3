//! Dataset
//!
//! The three case-count feeds (Confirmed, Deaths, Recovered):
//!
//! - **types**: Category, RegionRecord, TimeSeriesTable, Dataset
//! - **date**: feed label and canonical date conversion
//! - **parse**: CSV feed parsing
//! - **source**: where feeds come from (HTTP or a local directory)
//! - **loader**: one-time load into an immutable, shared `Dataset`
//! - **error**: error types
//!
//! # Example
//!
//! ```rust,no_run
//! use covid_dashboard::dataset::{DatasetLoader, HttpFeedSource, DEFAULT_BASE_URL};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpFeedSource::new(DEFAULT_BASE_URL, Duration::from_secs(30))?;
//!     let dataset = DatasetLoader::new(source).load().await?;
//!
//!     println!("{} regions, last day {}", dataset.region_count(), dataset.last_date());
//!     Ok(())
//! }
//! ```

pub mod date;
pub mod error;
pub mod loader;
pub mod parse;
pub mod source;
pub mod types;

pub use date::{canonical_date, format_date, parse_date};
pub use error::{DatasetError, DatasetResult};
pub use loader::{dataset_from_csv, DatasetLoader};
pub use parse::parse_table;
pub use source::{feed_file_name, FeedSource, FileFeedSource, HttpFeedSource, DEFAULT_BASE_URL};
pub use types::{Category, Dataset, PerCategory, RegionRecord, TimeSeriesTable};
