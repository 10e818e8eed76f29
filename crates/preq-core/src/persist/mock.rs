//! In-memory backend for tests and throwaway sessions.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use super::Persister;
use crate::codec::SerializedRequest;
use crate::error::Result;

/// Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct MockPersister {
    records: Arc<Mutex<Vec<SerializedRequest>>>,
}

impl MockPersister {
    /// Isolated instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide instance, shared by every manager opened with the mock
    /// persistence type.
    pub fn global() -> Self {
        static GLOBAL: OnceLock<MockPersister> = OnceLock::new();
        GLOBAL.get_or_init(MockPersister::new).clone()
    }

    pub fn snapshot(&self) -> Vec<SerializedRequest> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SerializedRequest>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Persister for MockPersister {
    async fn fetch_all(&self) -> Result<Vec<SerializedRequest>> {
        Ok(self.snapshot())
    }

    async fn replace_all(&self, records: &[SerializedRequest]) -> Result<()> {
        *self.lock() = records.to_vec();
        Ok(())
    }
}
