//! Request configuration, URL resolution, the default outgoing-data transform
//! and the wire projection handed to a transport.

use std::time::Duration;

use super::body::{FormValue, RequestBody, SearchParams, MIME_FORM_URLENCODED, MIME_JSON};
use super::headers::{HeaderMap, RequestHeaders, CONTENT_TYPE};
use super::method::Method;

/// Turns a body into what goes over the wire. May set headers in the request
/// scope. Not serializable: reloaded requests take it from [`ClientDefaults`].
pub type TransformRequest = fn(RequestBody, &mut HeaderMap) -> RequestBody;

/// Stringifies JSON and url-encoded bodies and fills in a matching
/// Content-Type when the request did not set one. Text and forms pass through.
pub fn default_transform_request(body: RequestBody, headers: &mut HeaderMap) -> RequestBody {
    match body {
        RequestBody::UrlEncoded(params) => {
            set_content_type_if_unset(headers, MIME_FORM_URLENCODED);
            RequestBody::Text(params.to_string())
        }
        RequestBody::Json(value) => {
            set_content_type_if_unset(headers, MIME_JSON);
            RequestBody::Text(value.to_string())
        }
        other => other,
    }
}

fn set_content_type_if_unset(headers: &mut HeaderMap, mime: &str) {
    if !headers.contains(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, mime);
    }
}

/// Query parameters as either a JSON object or pre-built search params.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParams {
    Object(serde_json::Map<String, serde_json::Value>),
    Search(SearchParams),
}

impl QueryParams {
    /// Object params follow the bracket convention: arrays become `key[]=v`
    /// pairs, nested objects are JSON text, top-level nulls are skipped.
    pub fn serialize(&self) -> String {
        match self {
            QueryParams::Search(params) => params.to_string(),
            QueryParams::Object(map) => {
                let mut parts = Vec::new();
                for (key, value) in map {
                    let (key, values) = match value {
                        serde_json::Value::Null => continue,
                        serde_json::Value::Array(items) => (format!("{key}[]"), items.iter().collect()),
                        single => (key.clone(), vec![single]),
                    };
                    for v in values {
                        parts.push(format!("{}={}", encode_param(&key), encode_param(&param_text(v))));
                    }
                }
                parts.join("&")
            }
        }
    }
}

fn param_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Form-style percent encoding that leaves `: $ , [ ]` readable.
fn encode_param(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace("%3A", ":")
        .replace("%24", "$")
        .replace("%2C", ",")
        .replace("%5B", "[")
        .replace("%5D", "]")
}

/// `scheme://` or protocol-relative `//`.
pub fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some((scheme, rest)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_alpha
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !rest.is_empty()
}

pub fn combine_urls(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Client-level configuration new requests start from.
#[derive(Debug, Clone)]
pub struct ClientDefaults {
    pub base_url: Option<String>,
    pub headers: RequestHeaders,
    pub timeout: Option<Duration>,
    pub transform_request: TransformRequest,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        let mut headers = RequestHeaders::default();
        headers.common.insert("Accept", "application/json, text/plain, */*");
        for method in [Method::Post, Method::Put, Method::Patch] {
            headers.set_for(method, CONTENT_TYPE, "application/x-www-form-urlencoded");
        }
        Self {
            base_url: None,
            headers,
            timeout: None,
            transform_request: default_transform_request,
        }
    }
}

impl ClientDefaults {
    /// A request pre-filled with these defaults.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequest {
        ClientRequest {
            method,
            url: url.into(),
            base_url: self.base_url.clone(),
            params: None,
            headers: self.headers.clone(),
            data: None,
            timeout: self.timeout,
            transform_request: self.transform_request,
            persistence_id: None,
        }
    }
}

/// A live, replayable request configuration.
#[derive(Debug, Clone)]
pub struct ClientRequest {
    pub method: Method,
    pub url: String,
    pub base_url: Option<String>,
    pub params: Option<QueryParams>,
    pub headers: RequestHeaders,
    pub data: Option<RequestBody>,
    pub timeout: Option<Duration>,
    pub transform_request: TransformRequest,
    /// Correlates a response with its queued envelope.
    pub persistence_id: Option<String>,
}

// The transform hook is behavior, not data; it is left out of equality.
impl PartialEq for ClientRequest {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
            && self.url == other.url
            && self.base_url == other.base_url
            && self.params == other.params
            && self.headers == other.headers
            && self.data == other.data
            && self.timeout == other.timeout
            && self.persistence_id == other.persistence_id
    }
}

impl ClientRequest {
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<super::headers::HeaderValue>,
    ) -> Self {
        self.headers.own.insert(name, value);
        self
    }

    pub fn with_data(mut self, data: RequestBody) -> Self {
        self.data = Some(data);
        self
    }

    /// Base URL + URL + serialized params, without any fragment.
    pub fn resolved_url(&self) -> String {
        let mut url = match &self.base_url {
            Some(base) if !is_absolute_url(&self.url) => combine_urls(base, &self.url),
            _ => self.url.clone(),
        };
        let serialized = self.params.as_ref().map(QueryParams::serialize).unwrap_or_default();
        if !serialized.is_empty() {
            if let Some(hash) = url.find('#') {
                url.truncate(hash);
            }
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&serialized);
        }
        url
    }

    /// Runs the transform on a copy of the body. Header side effects land in
    /// the request scope of `self`.
    pub fn transformed_body(&mut self) -> Option<RequestBody> {
        let body = self.data.clone()?;
        Some((self.transform_request)(body, &mut self.headers.own))
    }

    /// Projects the request onto what a transport sends. File parts backed
    /// by paths are read here.
    pub async fn to_wire(&self) -> std::io::Result<WireRequest> {
        let mut scratch = self.clone();
        let body = scratch.transformed_body();
        let mut headers = scratch.headers.flatten(self.method);

        let body = match body {
            None => WireBody::Empty,
            Some(RequestBody::Text(text)) if text.is_empty() => WireBody::Empty,
            Some(RequestBody::Text(text)) => WireBody::Bytes(text.into_bytes()),
            Some(RequestBody::Json(value)) => WireBody::Bytes(value.to_string().into_bytes()),
            Some(RequestBody::UrlEncoded(params)) => WireBody::Bytes(params.to_string().into_bytes()),
            Some(RequestBody::Form(form)) => {
                // The transport writes its own boundary-bearing Content-Type.
                headers.remove(CONTENT_TYPE);
                let mut parts = Vec::with_capacity(form.len());
                for (name, value) in form.iter() {
                    let part = match value {
                        FormValue::Text(text) => WirePart {
                            name: name.to_string(),
                            file_name: None,
                            content: text.clone().into_bytes(),
                        },
                        FormValue::File(file) => WirePart {
                            name: name.to_string(),
                            file_name: Some(file.file_name.clone()),
                            content: file.read().await?,
                        },
                    };
                    parts.push(part);
                }
                WireBody::Multipart(parts)
            }
        };

        Ok(WireRequest {
            method: self.method,
            url: self.resolved_url(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            body,
            timeout: self.timeout,
        })
    }
}

/// Transport-level view of a request: everything is text or bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: WireBody,
    pub timeout: Option<Duration>,
}

impl WireRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireBody {
    Empty,
    Bytes(Vec<u8>),
    Multipart(Vec<WirePart>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirePart {
    pub name: String,
    pub file_name: Option<String>,
    pub content: Vec<u8>,
}
