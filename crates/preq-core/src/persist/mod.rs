//! Persistence backends for the serialized queue.
//!
//! A backend stores the whole record set. Every persist replaces what was
//! there before; there is no per-record update.

mod kv;
mod local;
mod mock;


use async_trait::async_trait;

pub use kv::{default_store_path, KvStore};
pub use local::{LocalStorePersister, DEFAULT_KEY_PREFIX};
pub use mock::MockPersister;

use crate::codec::SerializedRequest;
use crate::error::Result;

#[async_trait]
pub trait Persister: Send + Sync {
    /// Every stored record, in write order.
    async fn fetch_all(&self) -> Result<Vec<SerializedRequest>>;

    /// Replaces the stored set with `records`.
    async fn replace_all(&self, records: &[SerializedRequest]) -> Result<()>;
}
