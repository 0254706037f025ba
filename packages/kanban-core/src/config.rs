/// Client configuration shared by anything that talks to a board store.
/// Reads client.json from ~/.config/kanban/client.json (or platform
/// equivalent); `API_ENDPOINT` in the environment overrides the file.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENDPOINT_ENV: &str = "API_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn default_endpoint() -> String {
    "http://localhost:3000/api".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

impl ClientConfig {
    /// Defaults with the environment override applied.
    pub fn from_env() -> Self {
        Self::default().with_env_override(std::env::var(ENDPOINT_ENV).ok())
    }

    fn with_env_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|value| !value.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        self
    }
}

/// Default config path: ~/.config/kanban/client.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kanban")
        .join("client.json")
}

/// Read a config file strictly: a missing or malformed file is an error.
pub fn read_config_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the client config from `path`, falling back to defaults when the
/// file is missing. The environment override is applied last.
pub fn load_client_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let config = match read_config_file(path) {
        Ok(config) => config,
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            log::info!("[kanban.config] No config at {}, using defaults", path.display());
            ClientConfig::default()
        }
        Err(e) => return Err(e),
    };
    Ok(config.with_env_override(std::env::var(ENDPOINT_ENV).ok()))
}
