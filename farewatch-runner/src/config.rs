//! TOML configuration for the refresh pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Pipeline configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    pub warehouse: WarehouseConfig,

    /// Object-store destination. Optional: local export needs no sink.
    #[serde(default)]
    pub sink: Option<SinkConfig>,
}

/// `[warehouse]` — the analytical source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Tenant identifier; also stamped into the snapshot.
    pub project_id: String,

    /// Dataset holding the monitoring tables and models.
    pub dataset: String,

    /// Base URL of the warehouse query endpoint.
    pub endpoint: String,

    /// Bounded per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Environment variable holding the bearer token. The token itself is
    /// never stored in the config file.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

/// `[sink]` — the object-store destination for scheduled refreshes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Base URL of the object store.
    pub endpoint: String,

    pub bucket: String,

    /// Object name under the bucket.
    #[serde(default = "default_object_name")]
    pub object: String,

    /// Client-side cache lifetime hint for dashboard consumers.
    #[serde(default = "default_cache_control")]
    pub cache_control: String,

    /// Environment variable holding the bearer token for the store.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_token_env() -> String {
    "FAREWATCH_TOKEN".into()
}

fn default_object_name() -> String {
    "dashboard_data.json".into()
}

fn default_cache_control() -> String {
    "no-cache, max-age=300".into()
}

impl RefreshConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
