use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;
use crate::sync::SyncError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Sync(SyncError::Store(err))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::InternalError(format!("Worker task failed: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, error_code) = match self {
            ApiError::Sync(e) if e.is_not_found() => {
                (StatusCode::NOT_FOUND, e.to_string(), "NOT_FOUND")
            }
            ApiError::Sync(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), "SYNC_ERROR"),
            ApiError::InvalidRequest(e) => (StatusCode::BAD_REQUEST, e, "INVALID_REQUEST"),
            ApiError::NotFound(e) => (StatusCode::NOT_FOUND, e, "NOT_FOUND"),
            ApiError::InternalError(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e, "INTERNAL_ERROR")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "code": error_code,
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
