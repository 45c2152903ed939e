use crate::domain::entities::{
    AuthUser, Contact, ContactMetadata, ContactSummary, ContactUpdate, Message, NewContact,
};
use crate::domain::errors::{Alert, DomainError, DomainResult};
use crate::domain::ports::channel_repository::ChannelRepository;
use crate::domain::ports::contact_repository::ContactRepository;
use crate::domain::ports::message_repository::MessageRepository;
use crate::shared::utils::phone::validate_phone_input;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const NO_CHANNEL_ALERT: &str = "No WhatsApp channels configured";
pub const DUPLICATE_PHONE_ALERT: &str = "This number is already registered";
pub const CREATE_FAILED_ALERT: &str = "Error creating contact";
pub const UPDATE_FAILED_ALERT: &str = "Error updating contact";

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactForm {
    pub name: String,
    pub phone_number: String,
}

/// Editable fields of the detail panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDetailsForm {
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub notes: String,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ContactDetailsForm {
    /// Form prefilled from the stored contact
    pub fn from_contact(contact: &Contact) -> Self {
        let metadata = &contact.metadata;
        Self {
            name: contact.name.clone(),
            company: metadata.company.clone().unwrap_or_default(),
            tax_id: metadata.tax_id.clone().unwrap_or_default(),
            role: metadata.role.clone().unwrap_or_default(),
            notes: metadata.notes.clone().unwrap_or_default(),
        }
    }

    /// Merge onto the existing metadata; keys the form does not know about
    /// are kept.
    pub fn into_update(self, existing: &ContactMetadata) -> ContactUpdate {
        let metadata = ContactMetadata {
            company: non_empty(&self.company),
            tax_id: non_empty(&self.tax_id),
            role: non_empty(&self.role),
            notes: non_empty(&self.notes),
            extra: existing.extra.clone(),
        };

        ContactUpdate {
            name: self.name.trim().to_string(),
            metadata,
        }
    }
}

/// A contact together with its message history
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub contact: Contact,
    pub messages: Vec<Message>,
}

#[derive(Clone)]
pub struct ContactService {
    contact_repo: Arc<dyn ContactRepository>,
    message_repo: Arc<dyn MessageRepository>,
    channel_repo: Arc<dyn ChannelRepository>,
}

impl ContactService {
    pub fn new(
        contact_repo: Arc<dyn ContactRepository>,
        message_repo: Arc<dyn MessageRepository>,
        channel_repo: Arc<dyn ChannelRepository>,
    ) -> Self {
        Self {
            contact_repo,
            message_repo,
            channel_repo,
        }
    }

    /// Chat list snapshot, most recent activity first
    pub async fn list_summaries(&self) -> DomainResult<Vec<ContactSummary>> {
        self.contact_repo.list_contact_summaries().await
    }

    pub async fn get_contact(&self, contact_id: &str) -> DomainResult<Contact> {
        self.contact_repo
            .get_contact(contact_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Contact not found".to_string()))
    }

    pub async fn open_conversation(&self, contact_id: &str) -> DomainResult<Conversation> {
        let contact = self.get_contact(contact_id).await?;
        let messages = self.message_repo.list_messages(contact_id).await?;
        Ok(Conversation { contact, messages })
    }

    pub async fn mark_read(&self, contact_id: &str) -> DomainResult<()> {
        self.contact_repo.reset_unread_count(contact_id).await
    }

    /// Create a contact on the first configured channel, assigned to the
    /// signed-in agent
    pub async fn create_contact(
        &self,
        agent: &AuthUser,
        form: CreateContactForm,
    ) -> Result<Contact, Alert> {
        let phone_number = validate_phone_input(&form.phone_number)
            .map_err(|e| Alert::caused_by(CREATE_FAILED_ALERT, e))?;

        let channel = self
            .channel_repo
            .first_channel()
            .await
            .map_err(|e| Alert::caused_by(CREATE_FAILED_ALERT, e))?
            .ok_or_else(|| Alert::new(NO_CHANNEL_ALERT))?;

        let new_contact = NewContact::from_agent(
            form.name.trim().to_string(),
            phone_number,
            channel.id,
            Some(agent.id.clone()),
        );

        match self.contact_repo.create_contact(&new_contact).await {
            Ok(contact) => {
                tracing::info!(
                    "Contact {} created by agent {}",
                    contact.id,
                    agent.id
                );
                Ok(contact)
            }
            Err(e) if e.is_unique_violation() => {
                tracing::debug!("Duplicate phone number {}", new_contact.phone_number);
                Err(Alert::caused_by(DUPLICATE_PHONE_ALERT, e))
            }
            Err(e) => {
                tracing::error!("Failed to create contact: {}", e);
                Err(Alert::caused_by(CREATE_FAILED_ALERT, e))
            }
        }
    }

    /// Save the detail panel
    pub async fn update_details(
        &self,
        contact_id: &str,
        form: ContactDetailsForm,
    ) -> Result<Contact, Alert> {
        let result = async {
            let existing = self.get_contact(contact_id).await?;
            let update = form.into_update(&existing.metadata);
            self.contact_repo.update_contact(contact_id, &update).await
        }
        .await;

        result.map_err(|e| {
            tracing::error!("Failed to update contact {}: {}", contact_id, e);
            Alert::caused_by(UPDATE_FAILED_ALERT, e)
        })
    }
}
