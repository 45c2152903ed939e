use crate::application::services::{
    is_webhook_path, route_decision, ContactService, MessageService, RouteDecision,
    SessionService, WhatsAppWebhookService,
};
use crate::domain::entities::{AuthSession, AuthUser};
use crate::domain::ports::change_feed::ChangeFeed;
use crate::domain::ports::template_repository::TemplateRepository;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// Refresh tokens outlive the access token; keep the cookie for a week
const REFRESH_COOKIE_MAX_AGE: i64 = 7 * 24 * 3600;
const DEFAULT_ACCESS_MAX_AGE: i64 = 3600;

#[derive(Clone)]
pub struct AppState {
    pub contact_service: ContactService,
    pub message_service: MessageService,
    pub session_service: SessionService,
    pub webhook_service: WhatsAppWebhookService,
    pub template_repo: Arc<dyn TemplateRepository>,
    pub change_feed: Arc<dyn ChangeFeed>,
}

/// Signed-in agent resolved by [`session_guard`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAgent(pub AuthUser);

/// `Set-Cookie` values storing a session
pub fn session_cookies(session: &AuthSession) -> [String; 2] {
    [
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            ACCESS_TOKEN_COOKIE,
            session.access_token,
            session.expires_in.unwrap_or(DEFAULT_ACCESS_MAX_AGE)
        ),
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            REFRESH_TOKEN_COOKIE, session.refresh_token, REFRESH_COOKIE_MAX_AGE
        ),
    ]
}

/// `Set-Cookie` values clearing the session
pub fn cleared_session_cookies() -> [String; 2] {
    [
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", ACCESS_TOKEN_COOKIE),
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", REFRESH_TOKEN_COOKIE),
    ]
}

pub fn append_cookies(response: &mut Response, cookies: [String; 2]) {
    for cookie in cookies {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!("Invalid cookie header: {}", e),
        }
    }
}

/// Route guard for every request. Webhook paths skip session handling;
/// everything else gets the agent resolved from the session cookies
/// (refreshing them when the access token was rejected) and is redirected
/// according to [`route_decision`].
pub async fn session_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_webhook_path(&path) {
        return next.run(request).await;
    }

    let jar = CookieJar::from_headers(request.headers());
    let resolved = state
        .session_service
        .resolve(
            jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value()),
            jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value()),
        )
        .await;

    let mut response = match route_decision(&path, resolved.user.is_some()) {
        RouteDecision::Redirect(target) => {
            tracing::debug!("Redirecting {} to {}", path, target);
            Redirect::to(target).into_response()
        }
        RouteDecision::Continue => {
            if let Some(user) = resolved.user.clone() {
                request.extensions_mut().insert(AuthenticatedAgent(user));
            }
            next.run(request).await
        }
    };

    if let Some(session) = resolved.refreshed.as_ref() {
        append_cookies(&mut response, session_cookies(session));
    }

    response
}
