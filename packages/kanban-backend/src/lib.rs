/// Kanban Backend: config loading, store selection and the REST server that
/// clients talk to through `HttpStore`.
pub mod api;
pub mod config;
pub mod server;
pub mod state;

use kanban_core::storage::local::LocalStore;
use kanban_core::storage::memory::MemoryStore;
use kanban_core::storage::BoardStore;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::server::ServerError;
use crate::state::AppState;

/// Open the store named by `config`: the board file when one is set,
/// otherwise an in-memory board.
pub fn open_store(config: &ServerConfig) -> Result<Arc<dyn BoardStore>, ServerError> {
    match &config.data_file {
        Some(path) => {
            let store = LocalStore::open(path, config.columns.clone())?;
            log::info!("[kanban.backend] Using board file {}", path.display());
            Ok(Arc::new(store))
        }
        None => {
            log::info!(
                "[kanban.backend] No data file configured, keeping the board in memory"
            );
            Ok(Arc::new(MemoryStore::with_columns(config.columns.clone())))
        }
    }
}

/// Open the store and start serving. Returns the bound port.
pub async fn start(config: &ServerConfig) -> Result<u16, ServerError> {
    let store = open_store(config)?;
    let state = AppState::new(store, config.port, &config.bind_address);
    server::spawn_server(state).await
}
