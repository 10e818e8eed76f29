//! Transport backed by libcurl (curl crate), run on the blocking pool.

use async_trait::async_trait;
use curl::easy::{Easy, Form, List};
use std::str;
use std::time::Duration;

use super::method::Method;
use super::request::{WireBody, WireRequest};
use super::{Transport, WireResponse};
use crate::error::{PreqError, Result};

#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    default_timeout: Duration,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            default_timeout: Duration::from_secs(60),
        }
    }
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, default_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            default_timeout,
        }
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.perform(&request))
            .await
            .map_err(|e| PreqError::Transport(format!("transfer task failed: {e}")))?
    }
}

impl CurlTransport {
    /// Runs in the current thread.
    fn perform(&self, request: &WireRequest) -> Result<WireResponse> {
        let mut easy = Easy::new();
        easy.url(&request.url)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(request.timeout.unwrap_or(self.default_timeout))?;

        match &request.body {
            WireBody::Empty => match request.method {
                Method::Get => easy.get(true)?,
                Method::Head => easy.nobody(true)?,
                other => easy.custom_request(other.as_str())?,
            },
            WireBody::Bytes(bytes) => {
                easy.post(true)?;
                easy.post_fields_copy(bytes)?;
                if request.method != Method::Post {
                    easy.custom_request(request.method.as_str())?;
                }
            }
            WireBody::Multipart(parts) => {
                let mut form = Form::new();
                for part in parts {
                    match &part.file_name {
                        Some(file_name) => form
                            .part(&part.name)
                            .buffer(file_name, part.content.clone())
                            .add()?,
                        None => form.part(&part.name).contents(&part.content).add()?,
                    }
                }
                easy.httppost(form)?;
                if request.method != Method::Post {
                    easy.custom_request(request.method.as_str())?;
                }
            }
        }

        let mut list = List::new();
        for (name, value) in &request.headers {
            list.append(&format!("{}: {}", name.trim(), value.trim()))?;
        }
        if !request.headers.is_empty() {
            easy.http_headers(list)?;
        }

        let mut body = Vec::new();
        let mut raw_headers: Vec<String> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    raw_headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(WireResponse {
            status: u16::try_from(status).unwrap_or(0),
            headers: parse_header_lines(&raw_headers),
            body,
        })
    }
}

/// `Name: value` lines; status lines and blanks are skipped.
fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    lines
        .iter()
        .filter(|l| !l.starts_with("HTTP/"))
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect()
}
