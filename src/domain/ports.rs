use crate::domain::model::{Record, RecordExt};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Generic CRUD over named collections. Every view handler talks to storage through this.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn list_simple(&self, collection: &str) -> Result<Vec<Record>>;
    async fn create(&self, collection: &str, data: Record) -> Result<Record>;
    async fn read(&self, collection: &str, id: &str) -> Result<Record>;
    /// Merges `data` into the stored record.
    async fn update(&self, collection: &str, id: &str, data: Record) -> Result<Record>;
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Records whose `field` equals `value` as a string.
    async fn list_where(&self, collection: &str, field: &str, value: &str) -> Result<Vec<Record>> {
        let records = self.list_simple(collection).await?;
        Ok(records
            .into_iter()
            .filter(|r| r.str_field(field) == value)
            .collect())
    }
}

/// Turns a template name and its view model into markup.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, data: &Value) -> Result<String>;
}
