/// Structural checks over an order map.
///
/// The resolver tolerates every issue reported here; the audit only makes
/// them visible (logged after loading, asserted on in tests).
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::OrderMap;
use crate::types::{CardId, ColumnId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OrderIssue {
    /// A chain references an id that is neither a known card nor its head.
    Dangling { column: ColumnId, id: NodeId },
    /// A card is reachable from two chains, or twice from one.
    Aliased { card: CardId, first: ColumnId, second: ColumnId },
    /// The walk used up its step bound without reaching the head or `null`.
    Unterminated { column: ColumnId },
}

impl std::fmt::Display for OrderIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderIssue::Dangling { column, id } => {
                write!(f, "column {} references unknown id {}", column, id)
            }
            OrderIssue::Aliased { card, first, second } => {
                write!(f, "card {} is linked from both {} and {}", card, first, second)
            }
            OrderIssue::Unterminated { column } => {
                write!(f, "chain of column {} does not terminate", column)
            }
        }
    }
}

/// Walk every column chain and report structural issues.
///
/// Each walk is bounded by the number of map entries, which is enough to
/// traverse any well-formed chain back to its head.
pub fn audit<'a>(
    order: &OrderMap,
    columns: impl IntoIterator<Item = &'a ColumnId>,
    cards: impl IntoIterator<Item = &'a CardId>,
) -> Vec<OrderIssue> {
    let known: HashSet<&str> = cards.into_iter().map(CardId::as_str).collect();
    let bound = order.len();
    let mut owner: HashMap<NodeId, ColumnId> = HashMap::new();
    let mut issues = Vec::new();

    for column in columns {
        let mut current = order.successor(&NodeId::from(column));
        let mut terminated = false;
        for _ in 0..=bound {
            let Some(id) = current else {
                terminated = true;
                break;
            };
            if id == column {
                terminated = true;
                break;
            }
            if !known.contains(id.as_str()) {
                issues.push(OrderIssue::Dangling {
                    column: column.clone(),
                    id: id.clone(),
                });
            } else if let Some(first) = owner.get(id) {
                issues.push(OrderIssue::Aliased {
                    card: CardId::new(id.as_str()),
                    first: first.clone(),
                    second: column.clone(),
                });
                // Following an aliased link would re-walk the other chain.
                terminated = true;
                break;
            } else {
                owner.insert(id.clone(), column.clone());
            }
            current = order.successor(id);
        }
        if !terminated {
            issues.push(OrderIssue::Unterminated {
                column: column.clone(),
            });
        }
    }

    issues
}
