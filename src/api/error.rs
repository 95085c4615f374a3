//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::cursor::CursorError;
use crate::dataset::DatasetError;
use crate::view::ViewError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Date is not one of the dataset's dates
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Dataset layer error
    #[error("Dataset error: {0}")]
    Dataset(DatasetError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DatasetError> for ApiError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::UnknownDate(date) => ApiError::InvalidDate(date.to_string()),
            DatasetError::InvalidDateLabel(label) => ApiError::InvalidDate(label),
            other => ApiError::Dataset(other),
        }
    }
}

impl From<CursorError> for ApiError {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::InvalidDate(date) => ApiError::InvalidDate(date),
        }
    }
}

impl From<ViewError> for ApiError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::Cursor(e) => e.into(),
            ViewError::Dataset(e) => e.into(),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "INVALID_DATE"),
            ApiError::Dataset(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATASET_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_unknown_date_is_client_error() {
        let date = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
        let err: ApiError = ViewError::Dataset(DatasetError::UnknownDate(date)).into();
        assert!(matches!(err, ApiError::InvalidDate(ref d) if d == "2019-12-31"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_dataset_error_is_server_error() {
        let err: ApiError = DatasetError::Empty.into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
