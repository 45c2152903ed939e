use crate::domain::entities::AuthUser;
use crate::infrastructure::http::middleware::{
    append_cookies, cleared_session_cookies, session_cookies, ApiError, ApiResult, AppState,
    ACCESS_TOKEN_COOKIE,
};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: AuthUser,
    pub redirect: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub redirect: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Response> {
    let session_state = state
        .session_service
        .sign_in(&request.email, &request.password)
        .await?;

    let session = session_state
        .session()
        .ok_or_else(|| ApiError::Unauthorized("No session issued".to_string()))?;

    let mut response = Json(LoginResponse {
        user: session.user.clone(),
        redirect: session_state.landing_path().to_string(),
    })
    .into_response();
    append_cookies(&mut response, session_cookies(session));

    Ok(response)
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let session_state = state
        .session_service
        .sign_out(jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value()))
        .await;

    let mut response = Json(LogoutResponse {
        redirect: session_state.landing_path().to_string(),
    })
    .into_response();
    append_cookies(&mut response, cleared_session_cookies());

    response
}

/// Guest landing page; signed-in agents never reach it
pub async fn home_page() -> &'static str {
    "Zyncro"
}

pub async fn login_page() -> &'static str {
    "Sign in to Zyncro"
}
