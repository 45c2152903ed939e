use crate::domain::events::{ChangeEvent, ChangeFilter};
use crate::domain::ports::change_feed::{ChangeFeed, Subscription, SubscriptionId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

struct Subscriber {
    topic: String,
    filter: ChangeFilter,
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

/// In-process change feed. Each subscriber gets its own queue, so delivery
/// is FIFO per subscription and a slow subscriber never drops events for
/// the others.
#[derive(Clone)]
pub struct LocalChangeFeed {
    subscribers: Arc<Mutex<HashMap<SubscriptionId, Subscriber>>>,
    next_id: Arc<AtomicU64>,
}

impl LocalChangeFeed {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SubscriptionId, Subscriber>> {
        // A panic while holding the lock cannot leave the map half-updated
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for LocalChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed for LocalChangeFeed {
    fn publish(&self, event: ChangeEvent) {
        let mut subscribers = self.lock();
        let mut closed = Vec::new();

        for (id, subscriber) in subscribers.iter() {
            if !subscriber.filter.matches(&event) {
                continue;
            }
            if subscriber.tx.send(event.clone()).is_err() {
                closed.push(*id);
            }
        }

        for id in closed {
            if let Some(subscriber) = subscribers.remove(&id) {
                tracing::debug!(
                    "Dropping subscription {} on '{}': receiver gone",
                    id,
                    subscriber.topic
                );
            }
        }
    }

    fn subscribe(&self, topic: &str, filter: ChangeFilter) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        self.lock().insert(
            id,
            Subscriber {
                topic: topic.to_string(),
                filter,
                tx,
            },
        );
        tracing::debug!("Subscription {} opened on '{}'", id, topic);

        Subscription::new(id, topic, Box::pin(UnboundedReceiverStream::new(rx)))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        match self.lock().remove(&id) {
            Some(subscriber) => {
                tracing::debug!("Subscription {} closed on '{}'", id, subscriber.topic);
                true
            }
            None => false,
        }
    }

    fn subscriber_count(&self) -> usize {
        self.lock().len()
    }
}
