use crate::domain::entities::{Message, NewMessage};
use crate::domain::errors::Alert;
use crate::domain::ports::message_repository::MessageRepository;
use std::sync::Arc;

pub const SEND_FAILED_ALERT: &str = "Could not send the message";

#[derive(Clone)]
pub struct MessageService {
    message_repo: Arc<dyn MessageRepository>,
}

impl MessageService {
    pub fn new(message_repo: Arc<dyn MessageRepository>) -> Self {
        Self { message_repo }
    }

    /// Store an outbound message typed by the agent. Blank drafts are not
    /// sent (`Ok(None)`). The stored message reaches the views through the
    /// change feed, never from this return value.
    pub async fn send_text(&self, contact_id: &str, draft: &str) -> Result<Option<Message>, Alert> {
        let content = draft.trim();
        if content.is_empty() {
            return Ok(None);
        }

        match self
            .message_repo
            .insert_message(&NewMessage::outbound(
                contact_id.to_string(),
                content.to_string(),
            ))
            .await
        {
            Ok(message) => {
                metrics::counter!("messages_sent_total").increment(1);
                tracing::debug!("Message {} sent to contact {}", message.id, contact_id);
                Ok(Some(message))
            }
            Err(e) => {
                tracing::error!("Failed to send message to contact {}: {}", contact_id, e);
                Err(Alert::caused_by(SEND_FAILED_ALERT, e))
            }
        }
    }
}
