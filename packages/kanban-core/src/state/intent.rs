use serde::{Deserialize, Serialize};

use crate::identity::generate_card_id;
use crate::order::OrderMap;
use crate::types::{Card, CardId, ColumnId, ColumnRecord, NodeId};

/// A user- or load-triggered state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all_fields = "camelCase")]
pub enum Intent {
    SetFilter {
        value: String,
    },
    ColumnsLoaded {
        columns: Vec<ColumnRecord>,
    },
    CardsLoaded {
        cards: Vec<Card>,
        order: OrderMap,
    },
    SetDraftText {
        column_id: ColumnId,
        value: String,
    },
    /// Add the column's draft as a new card at the front of the column.
    /// The id is minted by the dispatcher so the transition stays pure.
    ConfirmAdd {
        column_id: ColumnId,
        card_id: CardId,
    },
    StartDrag {
        card_id: CardId,
    },
    EndDrag,
    /// Drop the dragged card in front of `to_id`: a card, or a column id for
    /// the end of that column.
    Drop {
        to_id: NodeId,
    },
    RequestDelete {
        card_id: CardId,
    },
    CancelDelete,
    ConfirmDelete,
}

impl Intent {
    /// `ConfirmAdd` for `column_id` with a freshly minted card id.
    pub fn confirm_add(column_id: ColumnId) -> Self {
        Intent::ConfirmAdd {
            column_id,
            card_id: generate_card_id(),
        }
    }

    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SetFilter { .. } => "SetFilter",
            Intent::ColumnsLoaded { .. } => "ColumnsLoaded",
            Intent::CardsLoaded { .. } => "CardsLoaded",
            Intent::SetDraftText { .. } => "SetDraftText",
            Intent::ConfirmAdd { .. } => "ConfirmAdd",
            Intent::StartDrag { .. } => "StartDrag",
            Intent::EndDrag => "EndDrag",
            Intent::Drop { .. } => "Drop",
            Intent::RequestDelete { .. } => "RequestDelete",
            Intent::CancelDelete => "CancelDelete",
            Intent::ConfirmDelete => "ConfirmDelete",
        }
    }
}
