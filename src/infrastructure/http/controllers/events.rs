use crate::application::services::{chat_topic, CHAT_LIST_TOPIC};
use crate::domain::events::ChangeFilter;
use crate::domain::ports::change_feed::{ChangeFeed, SubscriptionId};
use crate::infrastructure::http::middleware::AppState;
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct EventStreamQuery {
    pub contact_id: Option<String>,
}

/// Removes the subscription once the SSE stream is dropped
struct SubscriptionGuard {
    feed: Arc<dyn ChangeFeed>,
    id: SubscriptionId,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if self.feed.unsubscribe(self.id) {
            tracing::info!("SSE subscription {} closed", self.id);
        }
    }
}

/// Live message inserts: every contact for the chat list, or a single
/// contact's conversation when `contact_id` is given
pub async fn event_stream(
    State(state): State<AppState>,
    Query(query): Query<EventStreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (topic, filter) = match query.contact_id {
        Some(contact_id) => (
            chat_topic(&contact_id),
            ChangeFilter::MessagesForContact(contact_id),
        ),
        None => (CHAT_LIST_TOPIC.to_string(), ChangeFilter::AllMessages),
    };

    let subscription = state.change_feed.subscribe(&topic, filter);
    tracing::info!("SSE subscription {} opened on {}", subscription.id(), topic);

    let guard = SubscriptionGuard {
        feed: state.change_feed.clone(),
        id: subscription.id(),
    };

    let stream = subscription.into_stream().map(move |event| {
        let _guard = &guard;
        let json_data = serde_json::to_string(&event).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize change event: {}", e);
            "{}".to_string()
        });

        Ok(Event::default().event("message_inserted").data(json_data))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
