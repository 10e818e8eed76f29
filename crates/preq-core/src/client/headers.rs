//! Header values and the three header scopes of a client request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::method::Method;

pub const CONTENT_TYPE: &str = "Content-Type";

/// A header value as the application set it. Transports only ever see the
/// string form, but the primitive type survives persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl HeaderValue {
    /// Maps any JSON value onto a header value; composite values keep their
    /// JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => HeaderValue::Bool(b),
            serde_json::Value::Number(n) => HeaderValue::Number(n),
            serde_json::Value::String(s) => HeaderValue::String(s),
            serde_json::Value::Null => HeaderValue::String(String::new()),
            other => HeaderValue::String(other.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Bool(b) => write!(f, "{b}"),
            HeaderValue::Number(n) => write!(f, "{n}"),
            HeaderValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        HeaderValue::String(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        HeaderValue::String(s)
    }
}

impl From<bool> for HeaderValue {
    fn from(b: bool) -> Self {
        HeaderValue::Bool(b)
    }
}

impl From<i64> for HeaderValue {
    fn from(n: i64) -> Self {
        HeaderValue::Number(n.into())
    }
}

impl From<u64> for HeaderValue {
    fn from(n: u64) -> Self {
        HeaderValue::Number(n.into())
    }
}

/// Ordered header map with case-insensitive names.
///
/// Inserting an existing name replaces the value in place (last writer wins)
/// and adopts the new spelling of the name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMap {
    entries: Vec<(String, HeaderValue)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<HeaderValue>,
    ) -> Option<HeaderValue> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => {
                let slot = &mut self.entries[i];
                slot.0 = name;
                Some(std::mem::replace(&mut slot.1, value))
            }
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<HeaderValue> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    /// Overlays `other` onto `self`, entry by entry.
    pub fn extend_from(&mut self, other: &HeaderMap) {
        for (name, value) in &other.entries {
            self.insert(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

impl<K: Into<String>, V: Into<HeaderValue>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Headers grouped the way client defaults are written: shared by every
/// request, per HTTP method, and set on this request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestHeaders {
    pub common: HeaderMap,
    pub per_method: BTreeMap<Method, HeaderMap>,
    pub own: HeaderMap,
}

impl RequestHeaders {
    /// Headers that live only in the request scope, e.g. after a reload.
    pub fn flat(own: HeaderMap) -> Self {
        Self {
            own,
            ..Self::default()
        }
    }

    /// Merges common < per-method < own into one map.
    pub fn flatten(&self, method: Method) -> HeaderMap {
        let mut merged = self.common.clone();
        if let Some(scoped) = self.per_method.get(&method) {
            merged.extend_from(scoped);
        }
        merged.extend_from(&self.own);
        merged
    }

    pub fn set_for(&mut self, method: Method, name: impl Into<String>, value: impl Into<HeaderValue>) {
        self.per_method.entry(method).or_default().insert(name, value);
    }
}
