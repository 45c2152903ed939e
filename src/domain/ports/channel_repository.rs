use crate::domain::entities::Channel;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// The default channel: whichever one exists first
    async fn first_channel(&self) -> DomainResult<Option<Channel>>;
}
