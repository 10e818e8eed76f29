//! Request bodies: plain text, JSON, url-encoded parameters and multipart forms.

use std::fmt;
use std::path::{Path, PathBuf};

pub const MIME_JSON: &str = "application/json";
pub const MIME_FORM_URLENCODED: &str = "application/x-www-form-urlencoded;charset=utf-8";
pub const MIME_MULTIPART: &str = "multipart/form-data";
pub const MIME_TEXT: &str = "text/plain";

/// Ordered `application/x-www-form-urlencoded` pairs; duplicate names allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `a=1&b=2`; a leading `?` is ignored.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        url::form_urlencoded::parse(input.as_bytes())
            .into_owned()
            .collect()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        f.write_str(&encoded)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Where a file part's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Bytes(Vec<u8>),
    /// Read lazily when the request is serialized or sent.
    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub source: FileSource,
}

impl FilePart {
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            source: FileSource::Bytes(bytes.into()),
        }
    }

    /// File part backed by a path; the file name is the last path component.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "blob".to_string());
        Self {
            file_name,
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Bytes(b) => Ok(b.clone()),
            FileSource::Path(p) => tokio::fs::read(p).await,
        }
    }

    /// Reads a path-backed part once and keeps its bytes from then on.
    pub async fn load(&mut self) -> std::io::Result<()> {
        if let FileSource::Path(p) = &self.source {
            self.source = FileSource::Bytes(tokio::fs::read(p).await?);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FilePart),
}

/// Multipart form fields in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), FormValue::Text(value.into())));
    }

    pub fn append_file(&mut self, name: impl Into<String>, file: FilePart) {
        self.entries.push((name.into(), FormValue::File(file)));
    }

    /// Pins every path-backed file part to its current bytes.
    pub async fn load_files(&mut self) -> std::io::Result<()> {
        for (_, value) in &mut self.entries {
            if let FormValue::File(file) = value {
                file.load().await?;
            }
        }
        Ok(())
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Json(serde_json::Value),
    UrlEncoded(SearchParams),
    Form(FormData),
}

impl RequestBody {
    /// Short name used in logs and listings.
    pub fn kind(&self) -> &'static str {
        match self {
            RequestBody::Text(_) => "text",
            RequestBody::Json(_) => "json",
            RequestBody::UrlEncoded(_) => "urlencoded",
            RequestBody::Form(_) => "form",
        }
    }
}
