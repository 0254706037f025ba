/// Ordering engine: chain reconstruction and minimal move patches.
///
/// Both operations are pure. `compute_move_patch` only ever emits the three
/// key/value pairs needed to splice one id out of its chain and back in
/// before its destination, so edits stay local no matter how long the chains
/// are, and replaying an applied move yields an empty patch.
use std::collections::HashMap;

use super::{OrderMap, OrderPatch};
use crate::types::{Card, ColumnId, NodeId};

/// Ordered cards of the column whose head is `head`.
///
/// Dangling ids (no matching card) are skipped. The walk is bounded by
/// `all_cards.len()` steps, so a corrupt map yields a truncated list rather
/// than looping forever.
pub fn resolve_order<'a>(all_cards: &'a [Card], order: &OrderMap, head: &ColumnId) -> Vec<&'a Card> {
    let by_id: HashMap<&str, &'a Card> = all_cards
        .iter()
        .map(|card| (card.id.as_str(), card))
        .collect();
    walk_chain(order, head, all_cards.len(), |id| by_id.get(id.as_str()).copied())
}

/// Walk the chain starting at `order[head]`, collecting whatever `lookup`
/// returns for each id, for at most `bound` steps.
///
/// Stops at a missing/`null` successor or on returning to `head`.
pub fn walk_chain<T>(
    order: &OrderMap,
    head: &ColumnId,
    bound: usize,
    mut lookup: impl FnMut(&NodeId) -> Option<T>,
) -> Vec<T> {
    let mut sorted = Vec::new();
    let mut current = order.successor(&NodeId::from(head));
    for _ in 0..bound {
        let Some(id) = current else { break };
        if id == head {
            break;
        }
        if let Some(item) = lookup(id) {
            sorted.push(item);
        }
        current = order.successor(id);
    }
    sorted
}

/// Minimal patch that moves `id` so it directly precedes `destination`.
///
/// With `destination == None` the id is unlinked and left orphaned (used for
/// deletion). All lookups read the pre-patch map; when the unlink and relink
/// keys coincide the relink wins.
pub fn compute_move_patch(order: &OrderMap, id: &NodeId, destination: Option<&NodeId>) -> OrderPatch {
    let mut patch = OrderPatch::new();
    if Some(id) == destination || order.entry(id) == Some(destination) {
        return patch;
    }

    if let Some(delete_key) = order.predecessor(id) {
        patch.set(delete_key.clone(), order.successor(id).cloned());
    }

    if let Some(destination) = destination {
        if let Some(insert_key) = order.predecessor(destination) {
            patch.set(insert_key.clone(), Some(id.clone()));
        }
    }

    patch.set(id.clone(), destination.cloned());
    patch
}

/// Patch inserting `id` at the front of `column`.
///
/// When the column has no head yet (missing or `null`), the head pointer is
/// linked to `id` as well; otherwise this is exactly a move in front of the
/// current first card.
pub fn compute_insert_patch(order: &OrderMap, id: &NodeId, column: &ColumnId) -> OrderPatch {
    let head_key = NodeId::from(column);
    let first = order.successor(&head_key);
    let mut patch = compute_move_patch(order, id, first);
    if first.is_none() {
        patch.set(head_key, Some(id.clone()));
    }
    patch
}

/// Patch moving `id` to the end of `column`.
///
/// For circular chains (and self-looped empty columns) this is exactly a move
/// in front of the column id. A headless column gets its head linked, and a
/// `null`-terminated chain gets its last card linked to `id`, closing the
/// ring back to the column.
pub fn compute_append_patch(order: &OrderMap, id: &NodeId, column: &ColumnId) -> OrderPatch {
    let head_key = NodeId::from(column);
    if order.predecessor(&head_key).is_some() {
        return compute_move_patch(order, id, Some(&head_key));
    }

    let Some(first) = order.successor(&head_key) else {
        let mut patch = compute_move_patch(order, id, Some(&head_key));
        patch.set(head_key, Some(id.clone()));
        return patch;
    };

    let mut last = first;
    let mut terminated = false;
    for _ in 0..order.len() {
        match order.successor(last) {
            Some(next) => last = next,
            None => {
                terminated = true;
                break;
            }
        }
    }
    if !terminated {
        log::warn!("[kanban.order] chain of column {} does not terminate", column);
        return compute_move_patch(order, id, Some(&head_key));
    }
    if last == id {
        return OrderPatch::new();
    }

    let mut patch = compute_move_patch(order, id, Some(&head_key));
    patch.set(last.clone(), Some(id.clone()));
    patch
}
