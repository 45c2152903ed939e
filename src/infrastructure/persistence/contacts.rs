use crate::domain::entities::{Contact, ContactMetadata, ContactSummary, ContactUpdate, NewContact};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::contact_repository::ContactRepository;
use crate::infrastructure::persistence::{optional_text, Database};
use crate::shared::utils::now_rfc3339;
use async_trait::async_trait;
use sqlx::any::AnyRow;
use sqlx::Row;
use uuid::Uuid;

const CONTACT_COLUMNS: &str = "id, name, phone_number, unread_count, avatar_url, labels, metadata, assigned_to, channel_id, updated_at";

fn contact_from_row(row: &AnyRow) -> DomainResult<Contact> {
    let labels: String = row.try_get("labels")?;
    let metadata: String = row.try_get("metadata")?;

    Ok(Contact {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        phone_number: row.try_get("phone_number")?,
        unread_count: row.try_get("unread_count")?,
        avatar_url: optional_text(row, "avatar_url"),
        labels: serde_json::from_str(&labels)?,
        metadata: serde_json::from_str::<ContactMetadata>(&metadata)?,
        assigned_to: optional_text(row, "assigned_to"),
        channel_id: optional_text(row, "channel_id"),
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    async fn fetch_contact(&self, contact_id: &str) -> DomainResult<Option<Contact>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM contacts WHERE id = ?",
            CONTACT_COLUMNS
        ))
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(contact_from_row).transpose()
    }
}

#[async_trait]
impl ContactRepository for Database {
    async fn list_contact_summaries(&self) -> DomainResult<Vec<ContactSummary>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM contacts ORDER BY updated_at DESC",
            CONTACT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let contact = contact_from_row(&row)?;
            let last_message = self.latest_message(&contact.id).await?;
            summaries.push(contact.summary(last_message));
        }

        Ok(summaries)
    }

    async fn get_contact(&self, contact_id: &str) -> DomainResult<Option<Contact>> {
        self.fetch_contact(contact_id).await
    }

    async fn get_contact_summary(&self, contact_id: &str) -> DomainResult<Option<ContactSummary>> {
        Ok(self
            .fetch_contact(contact_id)
            .await?
            .map(|contact| contact.summary(None)))
    }

    async fn find_contact_by_phone(&self, phone_number: &str) -> DomainResult<Option<Contact>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM contacts WHERE phone_number = ?",
            CONTACT_COLUMNS
        ))
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(contact_from_row).transpose()
    }

    async fn create_contact(&self, contact: &NewContact) -> DomainResult<Contact> {
        let created = Contact {
            id: Uuid::new_v4().to_string(),
            name: contact.name.clone(),
            phone_number: contact.phone_number.clone(),
            unread_count: contact.unread_count,
            avatar_url: None,
            labels: contact.labels.clone(),
            metadata: ContactMetadata::default(),
            assigned_to: contact.assigned_to.clone(),
            channel_id: Some(contact.channel_id.clone()),
            updated_at: now_rfc3339(),
        };

        sqlx::query(
            "INSERT INTO contacts (id, name, phone_number, unread_count, avatar_url, labels, metadata, assigned_to, channel_id, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&created.id)
        .bind(&created.name)
        .bind(&created.phone_number)
        .bind(created.unread_count)
        .bind(created.avatar_url.clone())
        .bind(serde_json::to_string(&created.labels)?)
        .bind(serde_json::to_string(&created.metadata)?)
        .bind(created.assigned_to.clone())
        .bind(created.channel_id.clone())
        .bind(&created.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        update: &ContactUpdate,
    ) -> DomainResult<Contact> {
        let result = sqlx::query("UPDATE contacts SET name = ?, metadata = ? WHERE id = ?")
            .bind(&update.name)
            .bind(serde_json::to_string(&update.metadata)?)
            .bind(contact_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Contact not found".to_string()));
        }

        self.fetch_contact(contact_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Contact not found".to_string()))
    }

    async fn reset_unread_count(&self, contact_id: &str) -> DomainResult<()> {
        sqlx::query("UPDATE contacts SET unread_count = 0 WHERE id = ?")
            .bind(contact_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
