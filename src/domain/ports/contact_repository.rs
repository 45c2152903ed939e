use crate::domain::entities::{Contact, ContactSummary, ContactUpdate, NewContact};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Chat-list snapshot, most recent activity first
    async fn list_contact_summaries(&self) -> DomainResult<Vec<ContactSummary>>;
    async fn get_contact(&self, contact_id: &str) -> DomainResult<Option<Contact>>;
    /// Summary fields of one contact, without a message preview
    async fn get_contact_summary(&self, contact_id: &str) -> DomainResult<Option<ContactSummary>>;
    async fn find_contact_by_phone(&self, phone_number: &str) -> DomainResult<Option<Contact>>;
    async fn create_contact(&self, contact: &NewContact) -> DomainResult<Contact>;
    async fn update_contact(&self, contact_id: &str, update: &ContactUpdate)
        -> DomainResult<Contact>;
    async fn reset_unread_count(&self, contact_id: &str) -> DomainResult<()>;
}
