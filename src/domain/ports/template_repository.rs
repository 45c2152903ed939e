use crate::domain::entities::Template;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn list_templates(&self) -> DomainResult<Vec<Template>>;
}
