//! HAR request entries to live requests.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::Path;

use super::export::BASE64_COMMENT;
use super::parse::{HarEntry, HarLog, HarParam, HarPostData};
use crate::client::{
    ClientDefaults, ClientRequest, FilePart, FormData, HeaderMap, Method, RequestBody,
    RequestHeaders, SearchParams,
};

pub fn read_har(path: &Path) -> Result<HarLog> {
    let bytes = std::fs::read(path).with_context(|| format!("read HAR file: {}", path.display()))?;
    let har: HarLog = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse HAR JSON: {}", path.display()))?;
    Ok(har)
}

/// One request per entry, built on `defaults`. Responses are ignored.
pub fn har_to_requests(har: &HarLog, defaults: &ClientDefaults) -> Result<Vec<ClientRequest>> {
    har.log
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| entry_to_request(entry, defaults).with_context(|| format!("HAR entry {i}")))
        .collect()
}

fn entry_to_request(entry: &HarEntry, defaults: &ClientDefaults) -> Result<ClientRequest> {
    let har_request = &entry.request;
    let method: Method = har_request.method.parse()?;
    let mut request = defaults.request(method, har_request.url.clone());

    // HTTP/2 pseudo-headers and lengths are recomputed by the transport.
    let headers: HeaderMap = har_request
        .headers
        .iter()
        .filter(|h| !h.name.starts_with(':') && !h.name.eq_ignore_ascii_case("content-length"))
        .map(|h| (h.name.clone(), h.value.clone()))
        .collect();
    if !headers.is_empty() {
        request.headers = RequestHeaders::flat(headers);
    }

    request.data = har_request.post_data.as_ref().map(har_body).transpose()?;
    Ok(request)
}

fn har_body(post_data: &HarPostData) -> Result<RequestBody> {
    let mime = post_data.mime_type.to_ascii_lowercase();
    if mime.starts_with("multipart/form-data") {
        return Ok(RequestBody::Form(form_from_params(&post_data.params)?));
    }
    if mime.starts_with("application/x-www-form-urlencoded") {
        if post_data.params.is_empty() {
            let text = post_data.text.as_deref().unwrap_or_default();
            return Ok(RequestBody::UrlEncoded(SearchParams::parse(text)));
        }
        let params: SearchParams = post_data
            .params
            .iter()
            .map(|p| (p.name.clone(), p.value.clone().unwrap_or_default()))
            .collect();
        return Ok(RequestBody::UrlEncoded(params));
    }

    let text = post_data.text.clone().unwrap_or_default();
    if mime.starts_with("application/json") {
        if let Ok(value) = serde_json::from_str(&text) {
            return Ok(RequestBody::Json(value));
        }
    }
    Ok(RequestBody::Text(text))
}

fn form_from_params(params: &[HarParam]) -> Result<FormData> {
    let mut form = FormData::new();
    for param in params {
        let value = param.value.clone().unwrap_or_default();
        match &param.file_name {
            Some(file_name) => {
                let bytes = if param.comment.as_deref() == Some(BASE64_COMMENT) {
                    BASE64
                        .decode(value.as_bytes())
                        .with_context(|| format!("decode file param '{}'", param.name))?
                } else {
                    value.into_bytes()
                };
                form.append_file(param.name.clone(), FilePart::from_bytes(file_name.clone(), bytes));
            }
            None => form.append_text(param.name.clone(), value),
        }
    }
    Ok(form)
}
