use crate::domain::entities::{Message, NewMessage};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert a message; implementations backed by a change feed publish the
    /// stored row to it.
    async fn insert_message(&self, message: &NewMessage) -> DomainResult<Message>;

    /// Like [`insert_message`](Self::insert_message), and also increments the
    /// contact's unread counter. Either both writes happen or neither does.
    async fn insert_unread_message(&self, message: &NewMessage) -> DomainResult<Message>;

    /// Full history of a contact, oldest first
    async fn list_messages(&self, contact_id: &str) -> DomainResult<Vec<Message>>;
}
