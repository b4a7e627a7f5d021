use crate::domain::model::{Record, RecordExt};
use crate::domain::ports::DataSource;
use crate::utils::error::{BackofficeError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Process-local `DataSource`. Records keep insertion order per collection.
#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    collections: RwLock<HashMap<String, Vec<Record>>>,
    next_id: AtomicU64,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 字串載入初始資料: `{ "collection": [ { ... }, ... ] }`
    pub fn from_json_str(content: &str) -> Result<Self> {
        let seed: HashMap<String, Vec<Record>> = serde_json::from_str(content)?;
        let source = Self::new();
        {
            let mut guard = source.collections.try_write().map_err(|e| {
                BackofficeError::storage(format!("seed lock unavailable: {}", e))
            })?;
            for (collection, records) in seed {
                let mut rows = Vec::with_capacity(records.len());
                for mut record in records {
                    if record.id().is_empty() {
                        let id = source.generate_id(&collection);
                        record.insert("id".into(), Value::from(id));
                    }
                    rows.push(record);
                }
                guard.insert(collection, rows);
            }
        }
        Ok(source)
    }

    /// 從 JSON 檔案載入初始資料
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn generate_id(&self, collection: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", collection.replace('_', "-"), n)
    }
}

fn now() -> Value {
    Value::from(chrono::Utc::now().to_rfc3339())
}

#[async_trait]
impl DataSource for InMemoryDataSource {
    async fn list_simple(&self, collection: &str) -> Result<Vec<Record>> {
        let guard = self.collections.read().await;
        Ok(guard.get(collection).cloned().unwrap_or_default())
    }

    async fn create(&self, collection: &str, mut data: Record) -> Result<Record> {
        if data.id().is_empty() {
            data.insert("id".into(), Value::from(self.generate_id(collection)));
        }
        data.entry("date_created").or_insert_with(now);

        let mut guard = self.collections.write().await;
        let rows = guard.entry(collection.to_string()).or_default();
        if rows.iter().any(|r| r.id() == data.id()) {
            return Err(BackofficeError::storage(format!(
                "duplicate id '{}' in {}",
                data.id(),
                collection
            )));
        }
        rows.push(data.clone());
        tracing::debug!(collection, id = data.id(), "record created");
        Ok(data)
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Record> {
        let guard = self.collections.read().await;
        guard
            .get(collection)
            .and_then(|rows| rows.iter().find(|r| r.id() == id))
            .cloned()
            .ok_or_else(|| BackofficeError::not_found(collection, id))
    }

    async fn update(&self, collection: &str, id: &str, data: Record) -> Result<Record> {
        let mut guard = self.collections.write().await;
        let record = guard
            .get_mut(collection)
            .and_then(|rows| rows.iter_mut().find(|r| r.id() == id))
            .ok_or_else(|| BackofficeError::not_found(collection, id))?;

        for (key, value) in data {
            if key != "id" {
                record.insert(key, value);
            }
        }
        record.insert("date_modified".into(), now());
        Ok(record.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut guard = self.collections.write().await;
        let rows = guard
            .get_mut(collection)
            .ok_or_else(|| BackofficeError::not_found(collection, id))?;
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        if rows.len() == before {
            return Err(BackofficeError::not_found(collection, id));
        }
        Ok(())
    }
}
