use crate::domain::entities::{AuthSession, AuthUser};
use async_trait::async_trait;
use thiserror::Error;

/// Message the auth backend returns for a wrong email/password pair
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    /// Rejected by the auth backend, with its message
    #[error("{0}")]
    Rejected(String),
    #[error("Auth backend unreachable: {0}")]
    Transport(String),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<AuthSession, AuthError>;

    /// Resolve the user behind an access token; `None` when the token is
    /// expired or invalid.
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}
