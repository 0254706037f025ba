/// Configuration for the Kanban Backend.
/// Reads server.json from ~/.config/kanban/server.json (or platform equivalent).
use kanban_core::config::{read_config_file, ConfigError};
use kanban_core::types::ColumnRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Board file for `LocalStore`. Without one the board lives in memory.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Columns a new board starts with.
    #[serde(default = "default_columns")]
    pub columns: Vec<ColumnRecord>,
}

fn default_port() -> u16 {
    3000
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_columns() -> Vec<ColumnRecord> {
    vec![
        ColumnRecord::new("todo", Some("TODO")),
        ColumnRecord::new("doing", Some("Doing")),
        ColumnRecord::new("done", Some("Done")),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            data_file: None,
            columns: default_columns(),
        }
    }
}

/// Default config path: ~/.config/kanban/server.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kanban")
        .join("server.json")
}

/// Load config from path. Returns default if the file is missing or broken.
pub fn load_config(path: &Path) -> ServerConfig {
    match read_config_file(path) {
        Ok(config) => config,
        Err(ConfigError::Io { .. }) => {
            log::info!("[kanban.config] No config at {}, using defaults", path.display());
            ServerConfig::default()
        }
        Err(e) => {
            log::warn!("[kanban.config] {}, using defaults", e);
            ServerConfig::default()
        }
    }
}
