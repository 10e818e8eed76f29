//! Durable backend: one key per record in the SQLite key/value store.

use async_trait::async_trait;

use super::kv::KvStore;
use super::Persister;
use crate::codec::SerializedRequest;
use crate::error::{PreqError, Result};

pub const DEFAULT_KEY_PREFIX: &str = "persistedQueue";

/// Stores each record as JSON under `"<prefix>:<requestId>"`.
#[derive(Clone)]
pub struct LocalStorePersister {
    store: KvStore,
    prefix: String,
}

impl LocalStorePersister {
    pub fn new(store: KvStore, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn store(&self) -> &KvStore {
        &self.store
    }

    pub fn key_for(&self, request_id: &str) -> String {
        format!("{}:{}", self.prefix, request_id)
    }

    fn key_prefix(&self) -> String {
        format!("{}:", self.prefix)
    }
}

#[async_trait]
impl Persister for LocalStorePersister {
    async fn fetch_all(&self) -> Result<Vec<SerializedRequest>> {
        let entries = self.store.entries_with_prefix(&self.key_prefix()).await?;
        entries
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_str(&value).map_err(|source| PreqError::MalformedRecord { key, source })
            })
            .collect()
    }

    async fn replace_all(&self, records: &[SerializedRequest]) -> Result<()> {
        let entries = records
            .iter()
            .map(|r| Ok((self.key_for(&r.request_id), serde_json::to_string(r)?)))
            .collect::<Result<Vec<_>>>()?;
        self.store.replace_prefix(&self.key_prefix(), &entries).await?;
        tracing::debug!(prefix = %self.prefix, count = entries.len(), "queue written to store");
        Ok(())
    }
}
