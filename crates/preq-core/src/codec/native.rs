//! Codec for requests of the native client binding.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;

use super::record::{FileEncoding, FormEntry, Header, PostData, SerializedRequest, HTTP_VERSION};
use crate::client::{
    ClientDefaults, ClientRequest, FilePart, FormData, FormValue, HeaderMap, HeaderValue, Method,
    RequestBody, RequestHeaders, SearchParams, CONTENT_TYPE, MIME_FORM_URLENCODED, MIME_JSON,
    MIME_MULTIPART, MIME_TEXT,
};
use crate::envelope::ClientType;
use crate::error::{ContentTypeUnresolvable, Result};

/// Substituted when a body cannot be mapped to a content type.
pub const UNKNOWN_CONTENT_TYPE: &str = "UNKNOWN";

/// Content type implied by the body a request was built with.
pub fn infer_content_type(
    body: Option<&RequestBody>,
) -> std::result::Result<&'static str, ContentTypeUnresolvable> {
    match body {
        Some(RequestBody::UrlEncoded(_)) => Ok(MIME_FORM_URLENCODED),
        Some(RequestBody::Json(_)) => Ok(MIME_JSON),
        Some(RequestBody::Form(_)) => Ok(MIME_MULTIPART),
        Some(RequestBody::Text(_)) => Err(ContentTypeUnresolvable { body_kind: "text" }),
        None => Err(ContentTypeUnresolvable { body_kind: "empty" }),
    }
}

/// Like [`infer_content_type`], but logs and falls back to the sentinel.
pub fn content_type_or_unknown(body: Option<&RequestBody>) -> &'static str {
    infer_content_type(body).unwrap_or_else(|e| {
        tracing::warn!("{e}; using {UNKNOWN_CONTENT_TYPE}");
        UNKNOWN_CONTENT_TYPE
    })
}

#[derive(Debug, Clone, Default)]
pub struct NativeCodec {
    defaults: ClientDefaults,
}

impl NativeCodec {
    pub fn new(defaults: ClientDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ClientDefaults {
        &self.defaults
    }

    /// Serializes `request` under `request_id`.
    ///
    /// Mutates the live request the same way sending it would: the outgoing
    /// transform may add a Content-Type, and an existing Content-Type is
    /// corrected to match the body.
    pub async fn serialize(
        &self,
        request_id: &str,
        request: &mut ClientRequest,
    ) -> Result<SerializedRequest> {
        // Later persists and the send must see the bytes captured here.
        if let Some(RequestBody::Form(form)) = request.data.as_mut() {
            form.load_files().await?;
        }
        let url = request.resolved_url();
        let transformed = request.transformed_body();
        remediate_content_type(request);

        let headers = request
            .headers
            .flatten(request.method)
            .iter()
            .map(|(name, value)| serialize_header(name, value))
            .collect::<Result<Vec<_>>>()?;

        let post_data = match transformed {
            None => None,
            Some(RequestBody::Text(text)) if text.is_empty() => None,
            Some(body) => Some(serialize_post_data(body, request.data.as_ref()).await?),
        };

        Ok(SerializedRequest {
            request_id: request_id.to_string(),
            client_type: ClientType::Native.as_str().to_string(),
            method: request.method.as_str().to_string(),
            url,
            http_version: HTTP_VERSION.to_string(),
            headers,
            post_data,
        })
    }

    /// Rebuilds a live request on top of the client defaults.
    pub fn deserialize(&self, record: &SerializedRequest) -> Result<ClientRequest> {
        let method: Method = record.method.parse()?;
        let mut request = self.defaults.request(method, record.url.clone());
        if !record.headers.is_empty() {
            request.headers = RequestHeaders::flat(deserialize_headers(&record.headers));
        }
        request.data = record
            .post_data
            .as_ref()
            .map(deserialize_post_data)
            .transpose()?;
        request.persistence_id = Some(record.request_id.clone());
        Ok(request)
    }
}

fn remediate_content_type(request: &mut ClientRequest) {
    if !request.headers.flatten(request.method).contains(CONTENT_TYPE) {
        return;
    }
    let mime = content_type_or_unknown(request.data.as_ref());
    if mime != UNKNOWN_CONTENT_TYPE {
        request.headers.own.insert(CONTENT_TYPE, mime);
    }
}

fn serialize_header(name: &str, value: &HeaderValue) -> Result<Header> {
    Ok(Header {
        name: name.to_string(),
        value: serde_json::to_string(value)?,
        comment: String::new(),
    })
}

/// Stored values that are not JSON (hand-written or imported records) are
/// taken as plain strings.
fn deserialize_headers(headers: &[Header]) -> HeaderMap {
    headers
        .iter()
        .map(|h| {
            let value = match serde_json::from_str::<Value>(&h.value) {
                Ok(v) => HeaderValue::from_json(v),
                Err(_) => HeaderValue::String(h.value.clone()),
            };
            (h.name.clone(), value)
        })
        .collect()
}

/// `transformed` is what goes over the wire; `built` is the body as the
/// request was built, used to remember how to rebuild it.
async fn serialize_post_data(
    transformed: RequestBody,
    built: Option<&RequestBody>,
) -> Result<PostData> {
    let (raw_data, mime) = match transformed {
        RequestBody::Form(form) => {
            return Ok(PostData {
                raw_data: serialize_form(&form).await?,
                is_form_data: true,
                mime_type: Some(MIME_MULTIPART.to_string()),
            });
        }
        RequestBody::Text(text) => {
            let mime = match built {
                Some(RequestBody::Json(_)) if serde_json::from_str::<Value>(&text).is_ok() => MIME_JSON,
                Some(RequestBody::UrlEncoded(_)) if SearchParams::parse(&text).to_string() == text => {
                    MIME_FORM_URLENCODED
                }
                _ => MIME_TEXT,
            };
            (text, mime)
        }
        RequestBody::Json(value) => (value.to_string(), MIME_JSON),
        RequestBody::UrlEncoded(params) => (params.to_string(), MIME_FORM_URLENCODED),
    };
    Ok(PostData {
        raw_data,
        is_form_data: false,
        mime_type: Some(mime.to_string()),
    })
}

async fn serialize_form(form: &FormData) -> Result<String> {
    let mut fields = serde_json::Map::new();
    for (name, value) in form.iter() {
        let entry = match value {
            FormValue::Text(text) => FormEntry {
                value: text.clone(),
                file_name: None,
                is_file: false,
                encoding: None,
            },
            FormValue::File(file) => {
                let bytes = file.read().await?;
                let (value, encoding) = match String::from_utf8(bytes) {
                    Ok(text) => (text, None),
                    Err(e) => (BASE64.encode(e.as_bytes()), Some(FileEncoding::Base64)),
                };
                FormEntry {
                    value,
                    file_name: Some(file.file_name.clone()),
                    is_file: true,
                    encoding,
                }
            }
        };
        // Repeated field names collapse to the last value.
        fields.insert(name.to_string(), serde_json::to_value(entry)?);
    }
    Ok(Value::Object(fields).to_string())
}

fn deserialize_post_data(post_data: &PostData) -> Result<RequestBody> {
    let raw = &post_data.raw_data;
    if post_data.is_form_data {
        return Ok(RequestBody::Form(deserialize_form(raw)?));
    }
    let body = match post_data.mime_type.as_deref() {
        Some(MIME_JSON) => RequestBody::Json(serde_json::from_str(raw)?),
        Some(MIME_FORM_URLENCODED) => RequestBody::UrlEncoded(SearchParams::parse(raw)),
        Some(_) => RequestBody::Text(raw.clone()),
        None => match serde_json::from_str::<Value>(raw) {
            Ok(value) => RequestBody::Json(value),
            Err(_) => RequestBody::Text(raw.clone()),
        },
    };
    Ok(body)
}

fn deserialize_form(raw: &str) -> Result<FormData> {
    let fields: serde_json::Map<String, Value> = serde_json::from_str(raw)?;
    let mut form = FormData::new();
    for (name, value) in fields {
        let entry: FormEntry = serde_json::from_value(value)?;
        if entry.is_file {
            let bytes = match entry.encoding {
                Some(FileEncoding::Base64) => BASE64.decode(entry.value.as_bytes())?,
                None => entry.value.into_bytes(),
            };
            let file_name = entry.file_name.unwrap_or_else(|| "blob".to_string());
            form.append_file(name, FilePart::from_bytes(file_name, bytes));
        } else {
            form.append_text(name, entry.value);
        }
    }
    Ok(form)
}
