//! Queue manager construction settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::client::ClientDefaults;
use crate::config::PreqConfig;
use crate::envelope::ClientType;
use crate::error::{PreqError, Result};
use crate::persist::DEFAULT_KEY_PREFIX;

/// Which backend a manager persists through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceType {
    /// SQLite key/value file.
    LocalStore,
    /// Process-wide in-memory list.
    Mock,
}

impl PersistenceType {
    pub fn as_str(self) -> &'static str {
        match self {
            PersistenceType::LocalStore => "local",
            PersistenceType::Mock => "mock",
        }
    }
}

impl fmt::Display for PersistenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersistenceType {
    type Err = PreqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "local" | "local_store" | "localStorage" | "LOCAL_DURABLE_STORE" => {
                Ok(PersistenceType::LocalStore)
            }
            "mock" | "MOCK" => Ok(PersistenceType::Mock),
            other => Err(PreqError::UnknownPersistenceType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueueSettings {
    /// Required when a new manager is created.
    pub persistence_type: Option<PersistenceType>,
    pub load_from_store: bool,
    /// Create a fresh manager instead of returning the cached one.
    pub reset_request_manager: bool,
    /// Client type used when enqueuing; native when unset.
    pub default_client_type: Option<ClientType>,
    /// Store file for [`PersistenceType::LocalStore`]; XDG state dir when unset.
    pub store_path: Option<PathBuf>,
    pub key_prefix: String,
    /// What deserialized requests are rebuilt on.
    pub client_defaults: ClientDefaults,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            persistence_type: None,
            load_from_store: false,
            reset_request_manager: true,
            default_client_type: None,
            store_path: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            client_defaults: ClientDefaults::default(),
        }
    }
}

impl QueueSettings {
    pub fn new(persistence_type: PersistenceType) -> Self {
        Self {
            persistence_type: Some(persistence_type),
            ..Self::default()
        }
    }

    pub fn from_config(cfg: &PreqConfig) -> Result<Self> {
        let mut client_defaults = ClientDefaults {
            base_url: cfg.client.base_url.clone(),
            timeout: cfg.client.timeout_secs.map(Duration::from_secs),
            ..ClientDefaults::default()
        };
        for (name, value) in &cfg.client.headers {
            client_defaults.headers.common.insert(name.as_str(), value.as_str());
        }

        Ok(Self {
            persistence_type: Some(cfg.store.persistence_type.parse()?),
            load_from_store: cfg.store.load_from_store,
            reset_request_manager: true,
            default_client_type: Some(cfg.client.default_client_type.parse()?),
            store_path: cfg.store.path.clone(),
            key_prefix: cfg.store.key_prefix.clone(),
            client_defaults,
        })
    }
}
