/// Requests the state machine emits for the backing store.
///
/// Commands are produced in transition order and sent fire-and-forget; the
/// store merges order patches key-wise, so a replayed or reordered patch
/// that was already applied changes nothing.
use serde::{Deserialize, Serialize};

use crate::order::OrderPatch;
use crate::types::{Card, CardId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreCommand {
    CreateCard { card: Card },
    DeleteCard { id: CardId },
    PatchOrder { patch: OrderPatch },
}

impl StoreCommand {
    pub fn name(&self) -> &'static str {
        match self {
            StoreCommand::CreateCard { .. } => "create_card",
            StoreCommand::DeleteCard { .. } => "delete_card",
            StoreCommand::PatchOrder { .. } => "patch_order",
        }
    }
}
