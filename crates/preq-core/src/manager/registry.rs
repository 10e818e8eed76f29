//! Explicit holder for the one live manager.

use super::{QueueSettings, RequestManager, SharedManager};
use crate::error::{PreqError, Result};

#[derive(Default)]
pub struct ManagerRegistry {
    current: Option<SharedManager>,
}

impl ManagerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached manager unless `settings.reset_request_manager` is
    /// set, in which case a fresh one replaces it. Without reset and without
    /// a cached manager this fails with `NotInitialized`.
    pub async fn acquire(&mut self, settings: &QueueSettings) -> Result<SharedManager> {
        if !settings.reset_request_manager {
            return self.current.clone().ok_or(PreqError::NotInitialized);
        }
        let manager = RequestManager::open(settings).await?.into_shared();
        self.current = Some(manager.clone());
        Ok(manager)
    }

    pub fn current(&self) -> Option<SharedManager> {
        self.current.clone()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
