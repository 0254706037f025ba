/// In-process board store.
///
/// Used by tests, and by the backend when no data file is configured.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{BoardStore, StoreError};
use crate::order::{OrderMap, OrderPatch};
use crate::types::{Card, CardId, ColumnRecord, NodeId};

/// Everything a store holds. Also the on-disk shape of `LocalStore`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardData {
    pub columns: Vec<ColumnRecord>,
    pub cards: Vec<Card>,
    #[serde(default)]
    pub order: OrderMap,
}

impl BoardData {
    /// A board with `columns` and no cards. Every column starts as an empty
    /// self-looped chain.
    pub fn seeded(columns: Vec<ColumnRecord>) -> Self {
        let order = columns
            .iter()
            .map(|column| (NodeId::from(&column.id), Some(NodeId::from(&column.id))))
            .collect();
        Self {
            columns,
            cards: Vec::new(),
            order,
        }
    }

    /// Insert or replace `card`, keeping the position of a replaced card.
    pub fn upsert_card(&mut self, card: &Card) {
        match self.cards.iter_mut().find(|existing| existing.id == card.id) {
            Some(existing) => *existing = card.clone(),
            None => self.cards.push(card.clone()),
        }
    }

    pub fn remove_card(&mut self, id: &CardId) -> Result<(), StoreError> {
        let index = self
            .cards
            .iter()
            .position(|card| &card.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.cards.remove(index);
        Ok(())
    }
}

pub struct MemoryStore {
    data: RwLock<BoardData>,
}

impl MemoryStore {
    pub fn new(data: BoardData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    pub fn with_columns(columns: Vec<ColumnRecord>) -> Self {
        Self::new(BoardData::seeded(columns))
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> BoardData {
        self.data.read().await.clone()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn load_columns(&self) -> Result<Vec<ColumnRecord>, StoreError> {
        Ok(self.data.read().await.columns.clone())
    }

    async fn load_cards(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.data.read().await.cards.clone())
    }

    async fn load_order(&self) -> Result<OrderMap, StoreError> {
        Ok(self.data.read().await.order.clone())
    }

    async fn create_card(&self, card: &Card) -> Result<Card, StoreError> {
        self.data.write().await.upsert_card(card);
        Ok(card.clone())
    }

    async fn delete_card(&self, id: &CardId) -> Result<(), StoreError> {
        self.data.write().await.remove_card(id)
    }

    async fn patch_order(&self, patch: &OrderPatch) -> Result<OrderMap, StoreError> {
        let mut data = self.data.write().await;
        data.order.merge(patch);
        Ok(data.order.clone())
    }
}
