//! Custom error types for the student API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::repositories::RepositoryError;
use crate::validation::FieldError;

/// Custom error type for the student API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request, such as a non-numeric path id
    #[error("Bad request: {0}")]
    BadRequest(&'static str),

    /// Client-supplied data failed one or more field constraints
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Referenced id has no live record
    #[error("Student not found")]
    NotFound,

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(errors) => ApiError::Validation(errors),
            RepositoryError::NotFound => ApiError::NotFound,
            RepositoryError::Database(e) => ApiError::Database(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid input data",
                    "details": errors,
                })),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Student not found" })),
            )
                .into_response(),
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Database error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
