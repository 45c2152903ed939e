use crate::infrastructure::http::controllers::{auth, dashboard, events, webhooks};
use crate::infrastructure::http::middleware::{session_guard, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    // Provider callbacks; the session guard lets these through untouched
    let webhook_routes = Router::new().route(
        "/api/webhooks/whatsapp",
        get(webhooks::verify_whatsapp_webhook).post(webhooks::receive_whatsapp_webhook),
    );

    // Everything under /dashboard requires a signed-in agent
    let dashboard_routes = Router::new()
        .route("/dashboard", get(dashboard::show_dashboard))
        .route(
            "/dashboard/api/contacts",
            get(dashboard::list_contacts).post(dashboard::create_contact),
        )
        .route(
            "/dashboard/api/contacts/:id",
            get(dashboard::get_conversation).patch(dashboard::update_contact_details),
        )
        .route(
            "/dashboard/api/contacts/:id/read",
            post(dashboard::mark_contact_read),
        )
        .route(
            "/dashboard/api/contacts/:id/messages",
            post(dashboard::send_message),
        )
        .route("/dashboard/api/templates", get(dashboard::list_templates))
        .route("/dashboard/api/events", get(events::event_stream));

    Router::new()
        .route("/", get(auth::home_page))
        .route("/login", get(auth::login_page))
        .route("/health", get(health_handler))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .merge(webhook_routes)
        .merge(dashboard_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_guard,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}
