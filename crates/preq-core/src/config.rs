use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the queue is persisted (`[store]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "local" (SQLite file) or "mock" (in-memory, lost on exit).
    pub persistence_type: String,
    /// Populate the queue from the store when the manager is created.
    pub load_from_store: bool,
    /// Records are stored under `<key_prefix>:<requestId>`.
    pub key_prefix: String,
    /// Store file; defaults to `~/.local/state/preq/store.db`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            persistence_type: "local".to_string(),
            load_from_store: true,
            key_prefix: "persistedQueue".to_string(),
            path: None,
        }
    }
}

/// Client defaults that replayed requests are rebuilt on (`[client]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    pub default_client_type: String,
    /// Extra headers sent with every request (common scope).
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: None,
            default_client_type: "NATIVE_CLIENT".to_string(),
            headers: BTreeMap::new(),
        }
    }
}

/// Global configuration loaded from `~/.config/preq/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreqConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("preq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PreqConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<PreqConfig> {
    if !path.exists() {
        let default_cfg = PreqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: PreqConfig = toml::from_str(&data)?;
    Ok(cfg)
}
