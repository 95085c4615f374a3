//! View Binding
//!
//! Connects cursor changes to recomputation:
//!
//! - **snapshot**: `DashboardView`, the complete set of outputs for a date
//! - **session**: `DashboardSession`, the cursor plus its committed view and
//!   a broadcast channel of `ViewUpdate`s for observers
//!
//! ```text
//!   step/set → compute totals, deltas, map, curve → commit → notify
//! ```

pub mod session;
pub mod snapshot;

pub use session::{DashboardSession, InfoPopover, ViewUpdate, DEFAULT_UPDATE_CAPACITY};
pub use snapshot::{CardColor, DashboardView, KpiCard};

use thiserror::Error;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Cursor(#[from] crate::cursor::CursorError),

    #[error(transparent)]
    Dataset(#[from] crate::dataset::DatasetError),
}

pub type ViewResult<T> = Result<T, ViewError>;
