//! Data Transfer Objects
//!
//! Request and response types for the API endpoints that are not already
//! view-model types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Available dates and the cursor position
#[derive(Debug, Serialize, Deserialize)]
pub struct DatesResponse {
    pub dates: Vec<NaiveDate>,
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub current: NaiveDate,
}

/// Direct date selection
#[derive(Debug, Deserialize)]
pub struct SetCursorRequest {
    /// `YYYY-MM-DD`, a trailing `T...` time part is ignored
    pub date: String,
}

/// Info popover state
#[derive(Debug, Serialize, Deserialize)]
pub struct PopoverResponse {
    pub is_open: bool,
}

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy"
    pub status: String,
    pub dataset: DatasetHealth,
    pub ws_connections: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Shape of the loaded dataset
#[derive(Debug, Serialize)]
pub struct DatasetHealth {
    pub regions: usize,
    pub dates: usize,
    pub first: NaiveDate,
    pub last: NaiveDate,
}
