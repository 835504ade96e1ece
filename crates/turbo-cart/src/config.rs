//! Cart configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::money::Currency;

/// Storage key the cart snapshot is persisted under by default.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Cart configuration file.
///
/// ```toml
/// currency = "BRL"
///
/// [api]
/// base_url = "http://localhost:3333"
/// timeout_ms = 5000
///
/// [storage]
/// key = "@RocketShoes:cart"
/// path = "storage.json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Product and stock service.
    #[serde(default)]
    pub api: ApiConfig,

    /// Snapshot persistence.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Currency applied to catalog prices. Codes are matched ignoring case.
    #[serde(default, deserialize_with = "currency_code")]
    pub currency: Currency,
}

impl CartConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Per-request timeout for catalog calls.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }
}

fn currency_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Currency, D::Error> {
    let code = String::deserialize(deserializer)?;
    Currency::from_code(&code)
        .ok_or_else(|| de::Error::custom(format!("unknown currency code: {}", code)))
}

/// Product and stock service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `/stock` and `/products` paths are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// File backing the store. Kept in memory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            path: None,
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
