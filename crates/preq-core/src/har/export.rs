//! Queued records to a HAR log.

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use serde_json::Value;
use std::io::Write;

use super::parse::{
    HarCreator, HarEntry, HarHeader, HarLog, HarParam, HarPostData, HarRequest, HarResponse,
    HarRoot, HarTimings, HAR_VERSION,
};
use crate::client::{HeaderValue, MIME_MULTIPART, MIME_TEXT};
use crate::codec::{FileEncoding, FormEntry, PostData, SerializedRequest};
use crate::ids::id_timestamp_millis;

/// Protocol the transport speaks; the record's `httpVersion` is a format tag.
const WIRE_HTTP_VERSION: &str = "HTTP/1.1";

/// Marks a file param whose value is base64.
pub(crate) const BASE64_COMMENT: &str = "base64";

/// One entry per record, in queue order. None of them has a response yet,
/// so every response is status 0.
pub fn records_to_har(records: &[SerializedRequest]) -> Result<HarLog> {
    let entries = records
        .iter()
        .map(record_entry)
        .collect::<Result<Vec<_>>>()?;
    Ok(HarLog {
        log: HarRoot {
            version: HAR_VERSION.to_string(),
            creator: HarCreator {
                name: "preq".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            entries,
        },
    })
}

pub fn write_har<W: Write>(records: &[SerializedRequest], writer: W) -> Result<()> {
    let har = records_to_har(records)?;
    serde_json::to_writer_pretty(writer, &har).context("write HAR JSON")?;
    Ok(())
}

fn record_entry(record: &SerializedRequest) -> Result<HarEntry> {
    let started_date_time = id_timestamp_millis(&record.request_id)
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default();

    let headers = record
        .headers
        .iter()
        .map(|h| HarHeader {
            name: h.name.clone(),
            value: header_text(&h.value),
        })
        .collect();

    let query_string = url::Url::parse(&record.url)
        .map(|u| {
            u.query_pairs()
                .map(|(name, value)| HarHeader {
                    name: name.into_owned(),
                    value: value.into_owned(),
                })
                .collect()
        })
        .unwrap_or_default();

    let post_data = record.post_data.as_ref().map(har_post_data).transpose()?;
    let body_size = post_data
        .as_ref()
        .and_then(|p: &HarPostData| p.text.as_ref())
        .map_or(0, |t| t.len() as i64);

    Ok(HarEntry {
        started_date_time,
        time: 0.0,
        request: HarRequest {
            method: record.method.clone(),
            url: record.url.clone(),
            http_version: WIRE_HTTP_VERSION.to_string(),
            cookies: Vec::new(),
            headers,
            query_string,
            post_data,
            headers_size: -1,
            body_size,
        },
        response: HarResponse::default(),
        cache: serde_json::Map::new(),
        timings: HarTimings::default(),
        comment: Some(record.request_id.clone()),
    })
}

/// Stored header values are JSON; HAR wants the wire text.
fn header_text(stored: &str) -> String {
    match serde_json::from_str::<Value>(stored) {
        Ok(value) => HeaderValue::from_json(value).to_string(),
        Err(_) => stored.to_string(),
    }
}

fn har_post_data(post_data: &PostData) -> Result<HarPostData> {
    if !post_data.is_form_data {
        return Ok(HarPostData {
            mime_type: post_data
                .mime_type
                .clone()
                .unwrap_or_else(|| MIME_TEXT.to_string()),
            params: Vec::new(),
            text: Some(post_data.raw_data.clone()),
        });
    }

    let fields: serde_json::Map<String, Value> =
        serde_json::from_str(&post_data.raw_data).context("parse stored form data")?;
    let mut params = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let entry: FormEntry = serde_json::from_value(value).context("parse stored form entry")?;
        params.push(HarParam {
            name,
            value: Some(entry.value),
            file_name: entry.file_name.filter(|_| entry.is_file),
            content_type: None,
            comment: match entry.encoding {
                Some(FileEncoding::Base64) => Some(BASE64_COMMENT.to_string()),
                None => None,
            },
        });
    }
    Ok(HarPostData {
        mime_type: MIME_MULTIPART.to_string(),
        params,
        text: None,
    })
}
