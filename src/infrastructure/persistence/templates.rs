use crate::domain::entities::Template;
use crate::domain::errors::DomainResult;
use crate::domain::ports::template_repository::TemplateRepository;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    pub async fn create_template(&self, name: &str, content: &str) -> DomainResult<Template> {
        let template = Template {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            content: content.to_string(),
        };

        sqlx::query("INSERT INTO templates (id, name, content) VALUES (?, ?, ?)")
            .bind(&template.id)
            .bind(&template.name)
            .bind(&template.content)
            .execute(&self.pool)
            .await?;

        Ok(template)
    }
}

#[async_trait]
impl TemplateRepository for Database {
    async fn list_templates(&self) -> DomainResult<Vec<Template>> {
        let rows = sqlx::query("SELECT id, name, content FROM templates ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut templates = Vec::with_capacity(rows.len());
        for row in rows {
            templates.push(Template {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                content: row.try_get("content")?,
            });
        }

        Ok(templates)
    }
}
