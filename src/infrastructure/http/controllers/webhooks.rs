use crate::application::services::DeliveryOutcome;
use crate::domain::entities::{VerifyQuery, WebhookPayload};
use crate::domain::services::webhook_signature::SIGNATURE_HEADER;
use crate::infrastructure::http::middleware::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

/// Subscription handshake from the WhatsApp Cloud API
pub async fn verify_whatsapp_webhook(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Response {
    match state.webhook_service.verify(&query) {
        Some(challenge) => (StatusCode::OK, challenge).into_response(),
        None => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
    }
}

/// Inbound message callbacks
pub async fn receive_whatsapp_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    if !state.webhook_service.is_authentic(&body, signature) {
        tracing::warn!("Rejected WhatsApp webhook with invalid signature");
        metrics::counter!("webhook_deliveries_total", "outcome" => "unauthorized").increment(1);
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Unreadable WhatsApp webhook body: {}", e);
            metrics::counter!("webhook_deliveries_total", "outcome" => "invalid").increment(1);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    match state.webhook_service.handle_delivery(&payload).await {
        DeliveryOutcome::Received => (StatusCode::OK, "EVENT_RECEIVED").into_response(),
        DeliveryOutcome::NotWhatsApp => {
            (StatusCode::NOT_FOUND, "Not a WhatsApp event").into_response()
        }
    }
}
