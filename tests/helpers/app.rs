#![allow(dead_code)]
use super::fakes::FakeAuthProvider;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;
use zyncro::bootstrap::build_app_state;
use zyncro::config::Config;
use zyncro::domain::ports::change_feed::ChangeFeed;
use zyncro::infrastructure::http::build_router;
use zyncro::infrastructure::persistence::Database;
use zyncro::infrastructure::realtime::LocalChangeFeed;

pub const VERIFY_TOKEN: &str = "verify-me";
pub const APP_SECRET: &str = "app-secret";

pub fn test_config(app_secret: Option<&str>) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 4321,
        supabase_url: "http://localhost:54321".to_string(),
        supabase_anon_key: "anon-key".to_string(),
        webhook_verify_token: VERIFY_TOKEN.to_string(),
        whatsapp_app_secret: app_secret.map(str::to_string),
        otel_exporter_endpoint: None,
        service_name: "zyncro-test".to_string(),
        metrics_port: 0,
    }
}

/// Router wired to the test database, a local feed and a fake auth backend
pub struct TestApp {
    pub router: Router,
    pub feed: Arc<LocalChangeFeed>,
    pub auth: Arc<FakeAuthProvider>,
}

impl TestApp {
    pub fn new(db: &Database) -> Self {
        Self::with_config(db, test_config(None))
    }

    pub fn with_config(db: &Database, config: Config) -> Self {
        let feed = Arc::new(LocalChangeFeed::new());
        let auth = Arc::new(FakeAuthProvider::new());
        let state = build_app_state(
            db.clone(),
            feed.clone() as Arc<dyn ChangeFeed>,
            auth.clone(),
            &config,
        );

        Self {
            router: build_router(state),
            feed,
            auth,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed")
    }
}

pub fn session_cookie(access_token: &str) -> String {
    format!("sb-access-token={}", access_token)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn authed_get(uri: &str, access_token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, session_cookie(access_token))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    body: &serde_json::Value,
    access_token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = access_token {
        builder = builder.header(header::COOKIE, session_cookie(token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).expect("Body is not JSON")
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect()
}
