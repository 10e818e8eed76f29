//! Queue manager: the in-memory queue of pending requests and every read and
//! write that goes through the persistence backend.
//!
//! Each mutating operation (enqueue, remove, reset) ends with a full persist
//! cycle. `set_queue` is the only mutator that does not persist.

mod registry;
mod settings;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use registry::ManagerRegistry;
pub use settings::{PersistenceType, QueueSettings};

use crate::client::ClientRequest;
use crate::codec::{RequestCodec, SerializedRequest};
use crate::envelope::{ClientType, RequestEnvelope};
use crate::error::{PreqError, Result};
use crate::ids::tag_request;
use crate::persist::{KvStore, LocalStorePersister, MockPersister, Persister};

/// Handle shared between the interceptor hooks and the caller. The lock is
/// held for a whole read-modify-persist cycle.
pub type SharedManager = Arc<tokio::sync::Mutex<RequestManager>>;

pub struct RequestManager {
    queue: Vec<RequestEnvelope>,
    persister: Arc<dyn Persister>,
    codec: RequestCodec,
    default_client_type: ClientType,
}

impl RequestManager {
    /// Builds a manager on the backend named by `settings`, loading the
    /// stored queue if asked to.
    pub async fn open(settings: &QueueSettings) -> Result<Self> {
        let persister: Arc<dyn Persister> = match settings.persistence_type {
            Some(PersistenceType::LocalStore) => {
                let store = match &settings.store_path {
                    Some(path) => KvStore::open_at(path).await?,
                    None => KvStore::open_default().await?,
                };
                Arc::new(LocalStorePersister::new(store, settings.key_prefix.clone()))
            }
            Some(PersistenceType::Mock) => Arc::new(MockPersister::global()),
            None => return Err(PreqError::UnknownPersistenceType("<unset>".to_string())),
        };

        let mut manager = Self::with_persister(persister, RequestCodec::new(settings.client_defaults.clone()))
            .with_default_client_type(settings.default_client_type.unwrap_or_default());
        if settings.load_from_store {
            manager.load_from_store().await?;
        }
        Ok(manager)
    }

    /// Empty manager over an existing backend.
    pub fn with_persister(persister: Arc<dyn Persister>, codec: RequestCodec) -> Self {
        Self {
            queue: Vec::new(),
            persister,
            codec,
            default_client_type: ClientType::default(),
        }
    }

    pub fn with_default_client_type(mut self, client_type: ClientType) -> Self {
        self.default_client_type = client_type;
        self
    }

    pub fn into_shared(self) -> SharedManager {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    pub fn default_client_type(&self) -> ClientType {
        self.default_client_type
    }

    pub fn codec(&self) -> &RequestCodec {
        &self.codec
    }

    pub fn queue(&self) -> &[RequestEnvelope] {
        &self.queue
    }

    /// Does not persist; call [`persist`](Self::persist) afterwards if needed.
    pub fn set_queue(&mut self, queue: Vec<RequestEnvelope>) {
        self.queue = queue;
    }

    pub fn get(&self, request_id: &str) -> Option<&RequestEnvelope> {
        self.queue.iter().find(|e| e.request_id == request_id)
    }

    /// Serializes the whole queue in order and replaces the stored set.
    pub async fn persist(&mut self) -> Result<()> {
        let records = self.codec.serialize_all(&mut self.queue).await?;
        self.persister.replace_all(&records).await?;
        tracing::debug!(count = records.len(), "queue persisted");
        Ok(())
    }

    /// Replaces the in-memory queue with what the backend holds.
    pub async fn load_from_store(&mut self) -> Result<()> {
        let records = self.persister.fetch_all().await?;
        self.queue = self.codec.deserialize_all(&records)?;
        tracing::debug!(count = self.queue.len(), "queue loaded from store");
        Ok(())
    }

    /// Records as currently stored by the backend.
    pub async fn stored_records(&self) -> Result<Vec<SerializedRequest>> {
        self.persister.fetch_all().await
    }

    /// Tags `request`, appends it and persists. The returned envelope carries
    /// any Content-Type correction made while serializing. If persisting
    /// fails the entry stays in the in-memory queue.
    pub async fn enqueue(
        &mut self,
        request: ClientRequest,
        client_type: ClientType,
    ) -> Result<RequestEnvelope> {
        let index = self.queue.len();
        self.queue.push(tag_request(request, client_type));
        self.persist().await?;
        let envelope = self.queue[index].clone();
        tracing::debug!(request_id = %envelope.request_id, "request enqueued");
        Ok(envelope)
    }

    /// `Ok(None)` when no entry has this id; nothing is persisted then.
    pub async fn remove_by_id(&mut self, request_id: &str) -> Result<Option<RequestEnvelope>> {
        let Some(position) = self.queue.iter().position(|e| e.request_id == request_id) else {
            return Ok(None);
        };
        let removed = self.queue.remove(position);
        self.persist().await?;
        tracing::debug!(%request_id, "request removed");
        Ok(Some(removed))
    }

    /// Empties the queue and persists the empty set.
    pub async fn reset(&mut self) -> Result<()> {
        self.queue.clear();
        self.persist().await
    }
}
