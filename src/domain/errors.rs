use thiserror::Error;

/// Postgres `unique_violation`; SQLite unique failures are reported with the
/// same code so callers match on a single value.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Conflict ({code}): {message}")]
    Conflict { code: String, message: String },
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DomainError::Conflict { code, .. } if code == UNIQUE_VIOLATION)
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation)
                    || message.contains("UNIQUE")
                {
                    DomainError::Conflict {
                        code: UNIQUE_VIOLATION.to_string(),
                        message,
                    }
                } else {
                    DomainError::Store(format!("Database error: {}", message))
                }
            }
            other => DomainError::Store(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Internal(format!("Serialization error: {}", err))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// A blocking, user-facing message raised by an agent action (send, save,
/// create, sign in). The underlying cause is kept for logging.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct Alert {
    pub message: String,
    pub cause: Option<DomainError>,
}

impl Alert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn caused_by(message: impl Into<String>, cause: DomainError) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause),
        }
    }
}
