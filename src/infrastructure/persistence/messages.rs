use crate::domain::entities::{Direction, Message, MessageStatus, NewMessage};
use crate::domain::errors::DomainResult;
use crate::domain::events::ChangeEvent;
use crate::domain::ports::message_repository::MessageRepository;
use crate::infrastructure::persistence::{optional_text, Database};
use crate::shared::utils::now_rfc3339;
use async_trait::async_trait;
use sqlx::any::AnyRow;
use sqlx::Row;
use uuid::Uuid;

fn message_from_row(row: &AnyRow) -> DomainResult<Message> {
    let direction: String = row.try_get("direction")?;
    let status: String = row.try_get("status")?;

    Ok(Message {
        id: row.try_get("id")?,
        contact_id: row.try_get("contact_id")?,
        direction: Direction::from(direction),
        content: row.try_get("content")?,
        status: MessageStatus::from(status),
        created_at: row.try_get("created_at")?,
        wam_id: optional_text(row, "wam_id"),
    })
}

impl Database {
    /// Most recent message of a contact, used as chat-list preview
    pub(crate) async fn latest_message(&self, contact_id: &str) -> DomainResult<Option<Message>> {
        let row = sqlx::query(
            "SELECT id, contact_id, direction, content, status, created_at, wam_id
             FROM messages
             WHERE contact_id = ?
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(message_from_row).transpose()
    }

    /// Insert the message and bump the contact's last activity (and, for
    /// `count_unread`, its unread counter) in one transaction. The change
    /// event is published only once the transaction has committed.
    async fn store_message(&self, message: &NewMessage, count_unread: bool) -> DomainResult<Message> {
        let stored = Message {
            id: Uuid::new_v4().to_string(),
            contact_id: message.contact_id.clone(),
            direction: message.direction,
            content: message.content.clone(),
            status: message.status,
            created_at: now_rfc3339(),
            wam_id: message.wam_id.clone(),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO messages (id, contact_id, direction, content, status, created_at, wam_id)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&stored.id)
        .bind(&stored.contact_id)
        .bind(stored.direction.as_str())
        .bind(&stored.content)
        .bind(stored.status.as_str())
        .bind(&stored.created_at)
        .bind(stored.wam_id.clone())
        .execute(&mut *tx)
        .await?;

        // Last activity drives the order of the chat-list snapshot
        let activity_update = if count_unread {
            "UPDATE contacts SET updated_at = ?, unread_count = unread_count + 1 WHERE id = ?"
        } else {
            "UPDATE contacts SET updated_at = ? WHERE id = ?"
        };
        sqlx::query(activity_update)
            .bind(&stored.created_at)
            .bind(&stored.contact_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.publish(ChangeEvent::MessageInserted(stored.clone()));

        Ok(stored)
    }
}

#[async_trait]
impl MessageRepository for Database {
    async fn insert_message(&self, message: &NewMessage) -> DomainResult<Message> {
        self.store_message(message, false).await
    }

    async fn insert_unread_message(&self, message: &NewMessage) -> DomainResult<Message> {
        self.store_message(message, true).await
    }

    async fn list_messages(&self, contact_id: &str) -> DomainResult<Vec<Message>> {
        let rows = sqlx::query(
            "SELECT id, contact_id, direction, content, status, created_at, wam_id
             FROM messages
             WHERE contact_id = ?
             ORDER BY created_at ASC",
        )
        .bind(contact_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(message_from_row).collect()
    }
}
