use crate::domain::entities::Message;
use serde::Serialize;

/// Row-level change pushed by the realtime feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "record", rename_all = "snake_case")]
pub enum ChangeEvent {
    MessageInserted(Message),
}

impl ChangeEvent {
    pub fn contact_id(&self) -> &str {
        match self {
            ChangeEvent::MessageInserted(message) => &message.contact_id,
        }
    }
}

/// Which inserts a subscriber wants to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeFilter {
    /// Every message insert (chat list)
    AllMessages,
    /// Inserts for one contact only (open chat window)
    MessagesForContact(String),
}

impl ChangeFilter {
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        match (self, event) {
            (ChangeFilter::AllMessages, ChangeEvent::MessageInserted(_)) => true,
            (ChangeFilter::MessagesForContact(id), ChangeEvent::MessageInserted(message)) => {
                &message.contact_id == id
            }
        }
    }
}
