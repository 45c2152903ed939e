use crate::domain::entities::Channel;
use crate::domain::errors::DomainResult;
use crate::domain::ports::channel_repository::ChannelRepository;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::Row;

impl Database {
    /// Register a WhatsApp channel
    pub async fn create_channel(&self, channel: &Channel) -> DomainResult<()> {
        sqlx::query("INSERT INTO channels (id) VALUES (?)")
            .bind(&channel.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ChannelRepository for Database {
    async fn first_channel(&self) -> DomainResult<Option<Channel>> {
        let row = sqlx::query("SELECT id FROM channels ORDER BY created_at ASC, id ASC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Channel {
                id: row.try_get("id")?,
            })),
            None => Ok(None),
        }
    }
}
