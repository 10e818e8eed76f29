//! Error taxonomy for the request queue.
//!
//! Configuration and construction mistakes surface as `PreqError` and abort the
//! operation. A body whose content type cannot be inferred is not an error at
//! this level: the codec logs a [`ContentTypeUnresolvable`] and keeps going.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PreqError>;

#[derive(Debug, Error)]
pub enum PreqError {
    /// Discriminator text that names no known client binding.
    #[error("unknown request client type '{0}'")]
    UnsupportedClientType(String),

    /// An existing manager was requested but none has been created yet.
    #[error("request manager not initialized")]
    NotInitialized,

    #[error("persistence type '{0}' not found")]
    UnknownPersistenceType(String),

    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// A stored value under `key` could not be parsed as a record.
    #[error("malformed record at '{key}': {source}")]
    MalformedRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The server answered, but not with a 2xx status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { status: u16, url: String },

    #[error("transport: {0}")]
    Transport(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("state directory: {0}")]
    StateDir(#[from] xdg::BaseDirectoriesError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid base64 file content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("curl: {0}")]
    Curl(#[from] curl::Error),

    #[error("curl form: {0}")]
    CurlForm(#[from] curl::FormError),
}

/// The codec could not map a body to a content type. Logged, never returned
/// from the send path.
#[derive(Debug, Error)]
#[error("unexpected content type fallthrough for {body_kind} body")]
pub struct ContentTypeUnresolvable {
    pub body_kind: &'static str,
}
