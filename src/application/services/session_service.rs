use crate::domain::entities::{AuthSession, AuthUser};
use crate::domain::errors::{Alert, DomainError};
use crate::domain::ports::auth_provider::{AuthError, AuthProvider, INVALID_CREDENTIALS};
use std::sync::Arc;

pub const INCORRECT_CREDENTIALS: &str = "Incorrect credentials";

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Paths under this prefix are served without a session
pub const WEBHOOK_PREFIX: &str = "/api/webhooks";

/// Agent-facing sign-in state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    SignedOut,
    SignedIn(AuthSession),
}

impl SessionState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            SessionState::SignedIn(session) => Some(&session.user),
            SessionState::SignedOut => None,
        }
    }

    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            SessionState::SignedIn(session) => Some(session),
            SessionState::SignedOut => None,
        }
    }

    /// Where the agent lands after a transition
    pub fn landing_path(&self) -> &'static str {
        match self {
            SessionState::SignedIn(_) => DASHBOARD_PATH,
            SessionState::SignedOut => LOGIN_PATH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Continue,
    Redirect(&'static str),
}

pub fn is_webhook_path(path: &str) -> bool {
    path.starts_with(WEBHOOK_PREFIX)
}

/// Route guard. Webhook paths always pass; dashboard paths need a user;
/// the login page and the root send a signed-in agent to the dashboard.
pub fn route_decision(path: &str, signed_in: bool) -> RouteDecision {
    if is_webhook_path(path) {
        return RouteDecision::Continue;
    }

    if path.starts_with(DASHBOARD_PATH) && !signed_in {
        return RouteDecision::Redirect(LOGIN_PATH);
    }

    if (path == LOGIN_PATH || path == "/") && signed_in {
        return RouteDecision::Redirect(DASHBOARD_PATH);
    }

    RouteDecision::Continue
}

/// Map backend auth messages to what the agent sees
pub fn translate_auth_error(error: &AuthError) -> String {
    match error {
        AuthError::Rejected(message) if message == INVALID_CREDENTIALS => {
            INCORRECT_CREDENTIALS.to_string()
        }
        AuthError::Rejected(message) => message.clone(),
        AuthError::Transport(_) => "Authentication service unavailable".to_string(),
    }
}

/// Result of resolving a request's session cookies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSession {
    pub user: Option<AuthUser>,
    /// Set when the access token was refreshed; the caller rewrites cookies
    pub refreshed: Option<AuthSession>,
}

#[derive(Clone)]
pub struct SessionService {
    auth: Arc<dyn AuthProvider>,
}

impl SessionService {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self { auth }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionState, Alert> {
        match self
            .auth
            .sign_in_with_password(email.trim(), password)
            .await
        {
            Ok(session) => {
                tracing::info!("Agent {} signed in", session.user.id);
                Ok(SessionState::SignedIn(session))
            }
            Err(e) => {
                tracing::warn!("Sign-in failed: {}", e);
                Err(Alert::caused_by(
                    translate_auth_error(&e),
                    DomainError::Unauthorized(e.to_string()),
                ))
            }
        }
    }

    /// Sign out. Failures are logged; the local state is cleared either way.
    pub async fn sign_out(&self, access_token: Option<&str>) -> SessionState {
        if let Some(token) = access_token {
            if let Err(e) = self.auth.sign_out(token).await {
                tracing::warn!("Sign-out failed: {}", e);
            }
        }
        SessionState::SignedOut
    }

    /// Resolve the user behind the session cookies, refreshing the access
    /// token when it has been rejected and a refresh token is available.
    pub async fn resolve(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> ResolvedSession {
        if let Some(token) = access_token {
            match self.auth.get_user(token).await {
                Ok(Some(user)) => {
                    return ResolvedSession {
                        user: Some(user),
                        refreshed: None,
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Failed to resolve session user: {}", e);
                    return ResolvedSession::default();
                }
            }
        }

        let Some(refresh_token) = refresh_token else {
            return ResolvedSession::default();
        };

        match self.auth.refresh_session(refresh_token).await {
            Ok(session) => {
                tracing::debug!("Refreshed session for {}", session.user.id);
                ResolvedSession {
                    user: Some(session.user.clone()),
                    refreshed: Some(session),
                }
            }
            Err(e) => {
                tracing::debug!("Session refresh rejected: {}", e);
                ResolvedSession::default()
            }
        }
    }
}
