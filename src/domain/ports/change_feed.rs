use crate::domain::events::{ChangeEvent, ChangeFilter};
use futures::{FutureExt, Stream, StreamExt};
use std::pin::Pin;

pub type SubscriptionId = u64;

/// Live stream of change events for one subscriber. Dropping it does not
/// release the slot in the feed; callers hand the id back through
/// [`ChangeFeed::unsubscribe`] when tearing down.
pub struct Subscription {
    id: SubscriptionId,
    topic: String,
    events: Pin<Box<dyn Stream<Item = ChangeEvent> + Send>>,
}

impl Subscription {
    pub fn new(
        id: SubscriptionId,
        topic: impl Into<String>,
        events: Pin<Box<dyn Stream<Item = ChangeEvent> + Send>>,
    ) -> Self {
        Self {
            id,
            topic: topic.into(),
            events,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wait for the next event; `None` once unsubscribed
    pub async fn next_event(&mut self) -> Option<ChangeEvent> {
        self.events.next().await
    }

    /// Next event if one is already queued
    pub fn try_next_event(&mut self) -> Option<ChangeEvent> {
        self.events.next().now_or_never().flatten()
    }

    pub fn into_stream(self) -> Pin<Box<dyn Stream<Item = ChangeEvent> + Send>> {
        self.events
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .finish()
    }
}

/// Realtime change feed: typed publish/subscribe over row inserts
pub trait ChangeFeed: Send + Sync {
    /// Deliver an event to every subscriber whose filter matches
    fn publish(&self, event: ChangeEvent);

    fn subscribe(&self, topic: &str, filter: ChangeFilter) -> Subscription;

    /// Remove a subscription and end its stream. Returns false when the id
    /// was unknown (already removed).
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    fn subscriber_count(&self) -> usize;
}
