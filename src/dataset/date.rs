//! Date label handling
//!
//! Feeds label their date columns `MM/DD/YY`; everything downstream works
//! with canonical `YYYY-MM-DD` dates.

use chrono::NaiveDate;

use super::error::{DatasetError, DatasetResult};

/// Format of the feed's date column headers
pub const FEED_DATE_FORMAT: &str = "%m/%d/%y";

/// Canonical date format
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Convert a feed header label (`1/22/20`, `01/22/20`) to a date
pub fn canonical_date(label: &str) -> DatasetResult<NaiveDate> {
    NaiveDate::parse_from_str(label.trim(), FEED_DATE_FORMAT)
        .map_err(|_| DatasetError::InvalidDateLabel(label.to_string()))
}

/// Parse a canonical date, dropping any trailing time part
///
/// Date pickers tend to send `2020-03-01T00:00:00`; only the date matters.
pub fn parse_date(input: &str) -> DatasetResult<NaiveDate> {
    let date_only = input.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_only, CANONICAL_DATE_FORMAT)
        .map_err(|_| DatasetError::InvalidDateLabel(input.to_string()))
}

/// Render a date in canonical form
pub fn format_date(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}
