/// Shared application state passed to axum handlers.
use kanban_core::storage::BoardStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BoardStore>,
    pub port: u16,
    pub bind_address: String,
}

impl AppState {
    pub fn new(store: Arc<dyn BoardStore>, port: u16, bind_address: &str) -> Self {
        Self {
            store,
            port,
            bind_address: bind_address.to_string(),
        }
    }
}
