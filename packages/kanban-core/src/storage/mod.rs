#[cfg(feature = "http-client")]
pub mod http;
pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::order::{OrderMap, OrderPatch};
use crate::sync::StoreCommand;
use crate::types::{Card, CardId, ColumnRecord};

/// The backing store holding columns, cards and the order map.
/// Implementations: MemoryStore (in-process), LocalStore (JSON file),
/// HttpStore (REST, behind the `http-client` feature).
#[async_trait]
pub trait BoardStore: Send + Sync {
    async fn load_columns(&self) -> Result<Vec<ColumnRecord>, StoreError>;

    async fn load_cards(&self) -> Result<Vec<Card>, StoreError>;

    async fn load_order(&self) -> Result<OrderMap, StoreError>;

    /// Store a card, replacing any card with the same id. Returns the stored card.
    async fn create_card(&self, card: &Card) -> Result<Card, StoreError>;

    /// Remove a card. The order map is left alone; callers send their own patch.
    async fn delete_card(&self, id: &CardId) -> Result<(), StoreError>;

    /// Merge `patch` into the order map key-wise and return the full map.
    async fn patch_order(&self, patch: &OrderPatch) -> Result<OrderMap, StoreError>;
}

/// Route one emitted command to the matching store call.
pub async fn execute(store: &dyn BoardStore, command: &StoreCommand) -> Result<(), StoreError> {
    match command {
        StoreCommand::CreateCard { card } => store.create_card(card).await.map(|_| ()),
        StoreCommand::DeleteCard { id } => store.delete_card(id).await,
        StoreCommand::PatchOrder { patch } => store.patch_order(patch).await.map(|_| ()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Card not found: {0}")]
    NotFound(CardId),

    #[error("{method} {url} failed: {status} {status_text}: {body}")]
    Api {
        method: String,
        url: String,
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether the store rejected the request itself, as opposed to failing to
    /// serve it. Client errors are logged at `warn`, everything else at `error`.
    pub fn is_client_error(&self) -> bool {
        match self {
            StoreError::NotFound(_) => true,
            StoreError::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}
