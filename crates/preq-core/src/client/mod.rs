//! Native HTTP client binding.
//!
//! A small request model (header scopes, query params, typed bodies, an
//! outgoing-data transform), a hook pipeline run around every send, and a
//! pluggable [`Transport`]. The queue persists [`ClientRequest`]s taken from
//! this pipeline and replays them through it.

mod body;
mod curl_transport;
mod headers;
mod hooks;
mod method;
mod request;

use async_trait::async_trait;
use std::sync::Arc;

pub use body::{
    FilePart, FileSource, FormData, FormValue, RequestBody, SearchParams, MIME_FORM_URLENCODED,
    MIME_JSON, MIME_MULTIPART, MIME_TEXT,
};
pub use curl_transport::CurlTransport;
pub use headers::{HeaderMap, HeaderValue, RequestHeaders, CONTENT_TYPE};
pub use hooks::{HookId, HookRegistry, Interceptors, RequestHook, ResponseHook};
pub use method::Method;
pub use request::{
    combine_urls, default_transform_request, is_absolute_url, ClientDefaults, ClientRequest,
    QueryParams, TransformRequest, WireBody, WirePart, WireRequest,
};

use crate::error::{PreqError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Sends a wire request and returns whatever the server answered.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: WireRequest) -> Result<WireResponse>;
}

/// A response paired with the request that produced it.
#[derive(Debug, Clone)]
pub struct ClientResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub request: ClientRequest,
}

pub struct HttpClient {
    defaults: ClientDefaults,
    interceptors: Interceptors,
    transport: Arc<dyn Transport>,
}

impl HttpClient {
    pub fn new(defaults: ClientDefaults, transport: Arc<dyn Transport>) -> Self {
        Self {
            defaults,
            interceptors: Interceptors::default(),
            transport,
        }
    }

    pub fn defaults(&self) -> &ClientDefaults {
        &self.defaults
    }

    pub fn interceptors(&self) -> &Interceptors {
        &self.interceptors
    }

    pub fn interceptors_mut(&mut self) -> &mut Interceptors {
        &mut self.interceptors
    }

    /// New request pre-filled with this client's defaults.
    pub fn build(&self, method: Method, url: impl Into<String>) -> ClientRequest {
        self.defaults.request(method, url)
    }

    /// Runs request hooks (newest first), sends, then runs response hooks in
    /// registration order. Non-2xx statuses fail with `HttpStatus` and skip
    /// the response hooks.
    pub async fn request(&self, request: ClientRequest) -> Result<ClientResponse> {
        let mut request = request;
        for hook in self.interceptors.request.snapshot().into_iter().rev() {
            request = hook.on_request(request).await?;
        }

        let wire = request.to_wire().await?;
        let url = wire.url.clone();
        tracing::debug!(method = %wire.method, %url, "sending request");
        let answer = self.transport.send(wire).await?;
        if !(200..300).contains(&answer.status) {
            return Err(PreqError::HttpStatus {
                status: answer.status,
                url,
            });
        }

        let mut response = ClientResponse {
            status: answer.status,
            headers: answer.headers,
            body: answer.body,
            request,
        };
        for hook in self.interceptors.response.snapshot() {
            response = hook.on_response(response).await?;
        }
        Ok(response)
    }
}
