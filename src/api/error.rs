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

use crate::query::QueryError;
use crate::storage::StorageError;
use crate::window::WindowError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed (bad series type, interval, date or body)
    #[error("{0}")]
    Validation(String),

    /// Single-row fetch found nothing
    #[error("{0}")]
    NotFound(String),

    /// Storage layer error, message passed through verbatim
    #[error("{0}")]
    Datastore(StorageError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Datastore(_) | ApiError::Internal(_) | ApiError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Datastore(_) => "DATASTORE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        if matches!(err, StorageError::InvalidTimestamp(_)) {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::Datastore(err)
        }
    }
}

impl From<WindowError> for ApiError {
    fn from(err: WindowError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub request_id: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            status = status.as_u16(),
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
