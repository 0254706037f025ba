/// Read-only view model handed to the rendering layer.
///
/// Derived from a snapshot on every read and never stored in it.
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::Snapshot;
use crate::search::CardFilter;
use crate::types::{is_non_blank, Card, CardId, Column, ColumnId};

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub filter_value: String,
    /// True until the columns have been loaded.
    pub loading: bool,
    pub columns: Vec<ColumnView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dragging_card_id: Option<CardId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleting_card_id: Option<CardId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub id: ColumnId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub draft_text: String,
    pub can_confirm_add: bool,
    pub cards_loading: bool,
    /// Cards in the column before filtering; absent while loading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
    pub visible_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_count_if_filtered: Option<usize>,
    pub visible_cards: Vec<CardView>,
    /// Dropping on the column's trailing area would not move anything.
    pub tail_drop_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: CardId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub fragments: Vec<TextFragment>,
    pub is_dragging: bool,
    /// Dropping in front of this card would not move anything.
    pub drop_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum TextFragment {
    Text(String),
    Link(String),
}

pub fn board_view(snapshot: &Snapshot) -> BoardView {
    let filter = CardFilter::compile(&snapshot.filter_value);
    let columns = snapshot
        .columns
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|column| column_view(snapshot, &filter, column))
        .collect();

    BoardView {
        filter_value: snapshot.filter_value.clone(),
        loading: snapshot.columns.is_none(),
        columns,
        dragging_card_id: snapshot.dragging_card_id.clone(),
        deleting_card_id: snapshot.deleting_card_id.clone(),
    }
}

fn column_view(snapshot: &Snapshot, filter: &CardFilter, column: &Column) -> ColumnView {
    let dragging = snapshot.dragging_card_id.as_ref();
    let resolved = snapshot.column_cards(&column.id);
    let total_count = resolved.as_ref().map(Vec::len);
    let visible: Vec<&Card> = resolved
        .unwrap_or_default()
        .into_iter()
        .filter(|card| filter.matches(card.text.as_deref()))
        .collect();

    let visible_cards: Vec<CardView> = visible
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let previous = index.checked_sub(1).map(|i| &visible[i].id);
            let drop_disabled = dragging
                .map(|dragged| &card.id == dragged || previous == Some(dragged))
                .unwrap_or(false);
            CardView {
                id: card.id.clone(),
                text: card.text.clone(),
                fragments: card.text.as_deref().map(split_links).unwrap_or_default(),
                is_dragging: dragging == Some(&card.id),
                drop_disabled,
            }
        })
        .collect();

    let tail_drop_disabled = match (dragging, visible.last()) {
        (Some(dragged), Some(last)) => &last.id == dragged,
        _ => false,
    };

    ColumnView {
        id: column.id.clone(),
        title: column.title.clone(),
        draft_text: column.draft_text.clone(),
        can_confirm_add: is_non_blank(&column.draft_text),
        cards_loading: total_count.is_none(),
        total_count,
        visible_count: visible_cards.len(),
        result_count_if_filtered: filter.is_active().then_some(visible_cards.len()),
        visible_cards,
        tail_drop_disabled,
    }
}

/// Split card text into plain runs and `http(s)://` links.
pub fn split_links(text: &str) -> Vec<TextFragment> {
    let mut fragments = Vec::new();
    let mut cursor = 0;
    for found in LINK_RE.find_iter(text) {
        if found.start() > cursor {
            fragments.push(TextFragment::Text(text[cursor..found.start()].to_string()));
        }
        fragments.push(TextFragment::Link(found.as_str().to_string()));
        cursor = found.end();
    }
    if cursor < text.len() {
        fragments.push(TextFragment::Text(text[cursor..].to_string()));
    }
    fragments
}
