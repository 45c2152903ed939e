use crate::domain::errors::{Alert, DomainError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Validation(msg) => ApiError::BadRequest(msg),
            DomainError::Conflict { message, .. } => ApiError::Conflict(message),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::Store(msg) | DomainError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

// The alert text is what the agent sees; the cause only picks the status
impl From<Alert> for ApiError {
    fn from(alert: Alert) -> Self {
        match alert.cause {
            Some(DomainError::NotFound(_)) => ApiError::NotFound(alert.message),
            Some(DomainError::Conflict { .. }) => ApiError::Conflict(alert.message),
            Some(DomainError::Unauthorized(_)) => ApiError::Unauthorized(alert.message),
            Some(DomainError::Store(_)) | Some(DomainError::Internal(_)) => {
                ApiError::Internal(alert.message)
            }
            Some(DomainError::Validation(_)) | None => ApiError::BadRequest(alert.message),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
