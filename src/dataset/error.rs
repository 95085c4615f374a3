//! Dataset error types
//!
//! Everything that can go wrong while fetching, parsing or indexing the
//! three case-count feeds.

use chrono::NaiveDate;
use thiserror::Error;

use super::types::Category;

/// Errors that can occur in the dataset layer
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Reading a local feed file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a remote feed failed
    #[error("HTTP error fetching {url}: {error}")]
    Http { url: String, error: String },

    /// The CSV reader rejected the feed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A date column header is not `MM/DD/YY`, or a requested date is not `YYYY-MM-DD`
    #[error("Invalid date label: {0}")]
    InvalidDateLabel(String),

    /// The header row lacks the four leading descriptive columns
    #[error("{category} feed: missing column {column}")]
    MissingColumn { category: Category, column: &'static str },

    /// A data row has fewer cells than the header
    #[error("{category} feed, line {line}: expected {expected} cells, found {found}")]
    MalformedRow {
        category: Category,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A count cell is not an integer
    #[error("{category} feed, line {line}, column {column}: invalid count {value:?}")]
    InvalidCount {
        category: Category,
        line: usize,
        column: String,
        value: String,
    },

    /// A latitude or longitude cell is not a number
    #[error("{category} feed, line {line}: invalid coordinate {value:?}")]
    InvalidCoordinate {
        category: Category,
        line: usize,
        value: String,
    },

    /// The three feeds do not share the same ordered date columns
    #[error("{category} feed dates do not match the confirmed feed")]
    DateMismatch { category: Category },

    /// Two date columns name the same day (`1/22/20` and `01/22/20`)
    #[error("Duplicate date column: {0}")]
    DuplicateDate(NaiveDate),

    /// The feeds carry no date columns at all
    #[error("Feeds contain no date columns")]
    Empty,

    /// Requested date is not part of the dataset
    #[error("Unknown date: {0}")]
    UnknownDate(NaiveDate),
}

impl From<reqwest::Error> for DatasetError {
    fn from(err: reqwest::Error) -> Self {
        DatasetError::Http {
            url: err
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "<unknown>".to_string()),
            error: err.to_string(),
        }
    }
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DatasetError::InvalidCount {
            category: Category::Deaths,
            line: 3,
            column: "01/22/20".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Deaths feed, line 3, column 01/22/20: invalid count \"abc\""
        );

        let date = NaiveDate::from_ymd_opt(2020, 1, 22).unwrap();
        assert_eq!(
            DatasetError::UnknownDate(date).to_string(),
            "Unknown date: 2020-01-22"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DatasetError = io_err.into();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
