//! Pre-send and post-response hook registries.

use async_trait::async_trait;
use std::sync::Arc;

use super::request::ClientRequest;
use super::ClientResponse;
use crate::error::Result;

/// Handle returned on registration, used to eject the hook again.
pub type HookId = usize;

#[async_trait]
pub trait RequestHook: Send + Sync {
    async fn on_request(&self, request: ClientRequest) -> Result<ClientRequest>;
}

#[async_trait]
pub trait ResponseHook: Send + Sync {
    async fn on_response(&self, response: ClientResponse) -> Result<ClientResponse>;
}

pub struct HookRegistry<H: ?Sized> {
    next_id: HookId,
    hooks: Vec<(HookId, Arc<H>)>,
}

impl<H: ?Sized> Default for HookRegistry<H> {
    fn default() -> Self {
        Self {
            next_id: 0,
            hooks: Vec::new(),
        }
    }
}

impl<H: ?Sized> HookRegistry<H> {
    pub fn register(&mut self, hook: Arc<H>) -> HookId {
        let id = self.next_id;
        self.next_id += 1;
        self.hooks.push((id, hook));
        id
    }

    /// Returns false if no hook with that id is registered.
    pub fn eject(&mut self, id: HookId) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(hid, _)| *hid != id);
        self.hooks.len() != before
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Hooks in registration order.
    pub(crate) fn snapshot(&self) -> Vec<Arc<H>> {
        self.hooks.iter().map(|(_, h)| Arc::clone(h)).collect()
    }
}

#[derive(Default)]
pub struct Interceptors {
    pub request: HookRegistry<dyn RequestHook>,
    pub response: HookRegistry<dyn ResponseHook>,
}
