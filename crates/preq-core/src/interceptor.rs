//! Glue between an [`HttpClient`] and a queue manager: every outgoing request
//! is queued and persisted before it is sent, and dropped from the queue once
//! a 2xx response comes back.

use async_trait::async_trait;
use std::sync::Arc;

use crate::client::{ClientRequest, ClientResponse, HookId, HttpClient, RequestHook, ResponseHook};
use crate::error::Result;
use crate::manager::{ManagerRegistry, SharedManager};

/// Enqueues the request and forwards the queued copy, which carries the
/// persistence id and any Content-Type correction.
pub struct PersistOnSend {
    manager: SharedManager,
}

#[async_trait]
impl RequestHook for PersistOnSend {
    async fn on_request(&self, request: ClientRequest) -> Result<ClientRequest> {
        let mut manager = self.manager.lock().await;
        let client_type = manager.default_client_type();
        let envelope = manager.enqueue(request, client_type).await?;
        Ok(envelope.into_native())
    }
}

/// Removes the entry matching the originating request's persistence id.
pub struct RemoveOnSuccess {
    manager: SharedManager,
}

#[async_trait]
impl ResponseHook for RemoveOnSuccess {
    async fn on_response(&self, response: ClientResponse) -> Result<ClientResponse> {
        if let Some(request_id) = response.request.persistence_id.as_deref() {
            if self.manager.lock().await.remove_by_id(request_id).await?.is_none() {
                tracing::debug!(%request_id, "completed request was not queued");
            }
        }
        Ok(response)
    }
}

/// Ids of the mounted hooks, needed to unmount them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterceptorHandles {
    pub request_hook: HookId,
    pub response_hook: HookId,
}

pub fn mount_interceptor(client: &mut HttpClient, manager: SharedManager) -> InterceptorHandles {
    let interceptors = client.interceptors_mut();
    let request_hook = interceptors.request.register(Arc::new(PersistOnSend {
        manager: manager.clone(),
    }));
    let response_hook = interceptors
        .response
        .register(Arc::new(RemoveOnSuccess { manager }));
    tracing::debug!(request_hook, response_hook, "queue interceptor mounted");
    InterceptorHandles {
        request_hook,
        response_hook,
    }
}

/// Ejects both hooks and drops the registry's cached manager.
pub fn unmount_interceptor(
    client: &mut HttpClient,
    handles: InterceptorHandles,
    registry: &mut ManagerRegistry,
) {
    let interceptors = client.interceptors_mut();
    interceptors.request.eject(handles.request_hook);
    interceptors.response.eject(handles.response_hook);
    registry.clear();
    tracing::debug!("queue interceptor unmounted");
}
