/// Application state machine: the client-side snapshot and the pure
/// transitions applied to it.
pub mod intent;
pub mod reducer;
pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::order::engine::walk_chain;
use crate::order::OrderMap;
use crate::search::CardFilter;
use crate::types::{Card, CardId, Column, ColumnId, NodeId};

pub use intent::Intent;
pub use reducer::{reduce, Transition};
pub use view::{board_view, BoardView, CardView, ColumnView, TextFragment};

/// The complete application state at one point in time.
///
/// `columns` and `cards_by_id` stay `None` until the initial load delivers
/// them. Transitions never mutate a snapshot; each produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub filter_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards_by_id: Option<BTreeMap<CardId, Card>>,
    #[serde(default)]
    pub order: OrderMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dragging_card_id: Option<CardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleting_card_id: Option<CardId>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.as_ref()?.iter().find(|column| &column.id == id)
    }

    /// The column whose id equals `id`, if `id` names a column at all.
    pub fn column_by_node(&self, id: &NodeId) -> Option<&Column> {
        self.columns
            .as_ref()?
            .iter()
            .find(|column| id == &column.id)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards_by_id.as_ref()?.get(id)
    }

    pub fn card_by_node(&self, id: &NodeId) -> Option<&Card> {
        self.cards_by_id.as_ref()?.get(&CardId::new(id.as_str()))
    }

    /// Cards of `column` in chain order, or `None` while cards are loading.
    pub fn column_cards(&self, column: &ColumnId) -> Option<Vec<&Card>> {
        let cards = self.cards_by_id.as_ref()?;
        Some(walk_chain(&self.order, column, cards.len(), |id| {
            cards.get(&CardId::new(id.as_str()))
        }))
    }

    /// Cards of `column` that pass the current filter.
    pub fn visible_cards(&self, column: &ColumnId) -> Option<Vec<&Card>> {
        let filter = CardFilter::compile(&self.filter_value);
        let mut cards = self.column_cards(column)?;
        cards.retain(|card| filter.matches(card.text.as_deref()));
        Some(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> Snapshot {
        Snapshot {
            filter_value: String::new(),
            columns: Some(vec![
                Column::from(crate::types::ColumnRecord::new("A", Some("TODO"))),
                Column::from(crate::types::ColumnRecord::new("B", Some("Done"))),
            ]),
            cards_by_id: Some(
                [
                    Card::new("1", Some("Buy milk")),
                    Card::new("2", Some("Call Bob")),
                    Card::new("3", None),
                ]
                .into_iter()
                .map(|card| (card.id.clone(), card))
                .collect(),
            ),
            order: [
                ("A", Some("1")),
                ("1", Some("2")),
                ("2", Some("A")),
                ("B", Some("3")),
                ("3", Some("B")),
            ]
            .into_iter()
            .collect(),
            dragging_card_id: None,
            deleting_card_id: None,
        }
    }

    #[test]
    fn test_column_cards_follow_order() {
        let snapshot = loaded();
        let ids: Vec<&str> = snapshot
            .column_cards(&ColumnId::from("A"))
            .unwrap()
            .iter()
            .map(|card| card.id.as_str())
            .collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn test_column_cards_none_while_loading() {
        let snapshot = Snapshot::new();
        assert!(snapshot.column_cards(&ColumnId::from("A")).is_none());
    }

    #[test]
    fn test_visible_cards_apply_filter() {
        let mut snapshot = loaded();
        snapshot.filter_value = "bo".to_string();
        let visible = snapshot.visible_cards(&ColumnId::from("A")).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, CardId::from("2"));
        assert!(snapshot.visible_cards(&ColumnId::from("B")).unwrap().is_empty());
    }

    #[test]
    fn test_lookup_by_node() {
        let snapshot = loaded();
        assert!(snapshot.column_by_node(&NodeId::from("A")).is_some());
        assert!(snapshot.column_by_node(&NodeId::from("1")).is_none());
        assert!(snapshot.card_by_node(&NodeId::from("1")).is_some());
    }
}
