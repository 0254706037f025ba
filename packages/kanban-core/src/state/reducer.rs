/// Pure transitions `(Snapshot, Intent) -> Snapshot`.
///
/// Every transition is total: when a precondition fails (nothing dragged,
/// stale card id, cards not loaded yet, ...) the input snapshot comes back
/// unchanged and nothing is emitted. Store commands are returned alongside
/// the new snapshot; sending them is the caller's business.
use std::collections::BTreeMap;

use super::{Intent, Snapshot};
use crate::order::engine::{compute_append_patch, compute_insert_patch, compute_move_patch};
use crate::order::OrderPatch;
use crate::sync::StoreCommand;
use crate::types::{is_non_blank, Card, CardId, Column, ColumnId, NodeId};

/// Result of applying one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub snapshot: Snapshot,
    pub commands: Vec<StoreCommand>,
}

impl Transition {
    fn unchanged(snapshot: &Snapshot, intent: &'static str, reason: &str) -> Self {
        log::debug!("[kanban.reducer] {} ignored: {}", intent, reason);
        Self {
            snapshot: snapshot.clone(),
            commands: Vec::new(),
        }
    }

    fn quiet(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            commands: Vec::new(),
        }
    }

    pub fn is_noop(&self, previous: &Snapshot) -> bool {
        self.commands.is_empty() && &self.snapshot == previous
    }
}

pub fn reduce(state: &Snapshot, intent: Intent) -> Transition {
    let name = intent.name();
    match intent {
        Intent::SetFilter { value } => {
            let mut next = state.clone();
            next.filter_value = value;
            Transition::quiet(next)
        }

        Intent::ColumnsLoaded { columns } => {
            if state.columns.is_some() {
                return Transition::unchanged(state, name, "columns already loaded");
            }
            let mut next = state.clone();
            next.columns = Some(columns.into_iter().map(Column::from).collect());
            Transition::quiet(next)
        }

        Intent::CardsLoaded { cards, order } => {
            if state.columns.is_none() {
                return Transition::unchanged(state, name, "columns not loaded");
            }
            let mut next = state.clone();
            next.order = order;
            next.cards_by_id = Some(
                cards
                    .into_iter()
                    .map(|card| (card.id.clone(), card))
                    .collect::<BTreeMap<_, _>>(),
            );
            Transition::quiet(next)
        }

        Intent::SetDraftText { column_id, value } => {
            if state.column(&column_id).is_none() {
                return Transition::unchanged(state, name, "unknown column");
            }
            let mut next = state.clone();
            if let Some(column) = column_mut(&mut next, &column_id) {
                column.draft_text = value;
            }
            Transition::quiet(next)
        }

        Intent::ConfirmAdd { column_id, card_id } => confirm_add(state, column_id, card_id),

        Intent::StartDrag { card_id } => {
            if state.card(&card_id).is_none() {
                return Transition::unchanged(state, name, "unknown card");
            }
            let mut next = state.clone();
            next.dragging_card_id = Some(card_id);
            Transition::quiet(next)
        }

        Intent::EndDrag => {
            let mut next = state.clone();
            next.dragging_card_id = None;
            Transition::quiet(next)
        }

        Intent::Drop { to_id } => drop_card(state, to_id),

        Intent::RequestDelete { card_id } => {
            if state.card(&card_id).is_none() {
                return Transition::unchanged(state, name, "unknown card");
            }
            let mut next = state.clone();
            next.deleting_card_id = Some(card_id);
            Transition::quiet(next)
        }

        Intent::CancelDelete => {
            let mut next = state.clone();
            next.deleting_card_id = None;
            Transition::quiet(next)
        }

        Intent::ConfirmDelete => confirm_delete(state),
    }
}

fn confirm_add(state: &Snapshot, column_id: ColumnId, card_id: CardId) -> Transition {
    let Some(cards) = state.cards_by_id.as_ref() else {
        return Transition::unchanged(state, "ConfirmAdd", "cards not loaded");
    };
    let Some(column) = state.column(&column_id) else {
        return Transition::unchanged(state, "ConfirmAdd", "unknown column");
    };
    if !is_non_blank(&column.draft_text) {
        return Transition::unchanged(state, "ConfirmAdd", "draft is blank");
    }
    let node = NodeId::from(&card_id);
    if cards.contains_key(&card_id) || state.order.contains_key(&node) {
        return Transition::unchanged(state, "ConfirmAdd", "card id already in use");
    }

    let card = Card {
        id: card_id.clone(),
        text: Some(column.draft_text.clone()),
    };
    let patch = compute_insert_patch(&state.order, &node, &column_id);

    let mut next = state.clone();
    if let Some(cards) = next.cards_by_id.as_mut() {
        cards.insert(card_id, card.clone());
    }
    if let Some(column) = column_mut(&mut next, &column_id) {
        column.draft_text.clear();
    }
    next.order.merge(&patch);

    let mut commands = vec![StoreCommand::CreateCard { card }];
    push_patch(&mut commands, patch);
    Transition {
        snapshot: next,
        commands,
    }
}

fn drop_card(state: &Snapshot, to_id: NodeId) -> Transition {
    let Some(from_id) = state.dragging_card_id.as_ref() else {
        return Transition::unchanged(state, "Drop", "nothing is being dragged");
    };
    if to_id == *from_id {
        return Transition::unchanged(state, "Drop", "dropped onto itself");
    }
    if state.card(from_id).is_none() {
        return Transition::unchanged(state, "Drop", "dragged card no longer exists");
    }
    let to_column = state.column_by_node(&to_id);
    if to_column.is_none() && state.card_by_node(&to_id).is_none() {
        return Transition::unchanged(state, "Drop", "unknown drop target");
    }

    let from_node = NodeId::from(from_id);
    let patch = match to_column {
        Some(column) => compute_append_patch(&state.order, &from_node, &column.id),
        None => compute_move_patch(&state.order, &from_node, Some(&to_id)),
    };

    let mut next = state.clone();
    next.order.merge(&patch);
    next.dragging_card_id = None;

    let mut commands = Vec::new();
    push_patch(&mut commands, patch);
    Transition {
        snapshot: next,
        commands,
    }
}

fn confirm_delete(state: &Snapshot) -> Transition {
    let Some(card_id) = state.deleting_card_id.clone() else {
        return Transition::unchanged(state, "ConfirmDelete", "no card awaiting deletion");
    };

    let mut next = state.clone();
    next.deleting_card_id = None;

    let removed = next
        .cards_by_id
        .as_mut()
        .and_then(|cards| cards.remove(&card_id));
    if removed.is_none() {
        log::debug!("[kanban.reducer] ConfirmDelete: card {} already gone", card_id);
        return Transition::quiet(next);
    }

    let patch = compute_move_patch(&state.order, &NodeId::from(&card_id), None);
    next.order.merge(&patch);

    let mut commands = Vec::new();
    push_patch(&mut commands, patch);
    commands.push(StoreCommand::DeleteCard { id: card_id });
    Transition {
        snapshot: next,
        commands,
    }
}

fn column_mut<'a>(snapshot: &'a mut Snapshot, id: &ColumnId) -> Option<&'a mut Column> {
    snapshot
        .columns
        .as_mut()?
        .iter_mut()
        .find(|column| &column.id == id)
}

fn push_patch(commands: &mut Vec<StoreCommand>, patch: OrderPatch) {
    if !patch.is_empty() {
        commands.push(StoreCommand::PatchOrder { patch });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::audit::audit;
    use crate::order::OrderMap;
    use crate::types::ColumnRecord;

    fn order(entries: &[(&str, Option<&str>)]) -> OrderMap {
        entries.iter().copied().collect()
    }

    fn patch(entries: &[(&str, Option<&str>)]) -> OrderPatch {
        entries.iter().copied().collect()
    }

    fn column_ids(snapshot: &Snapshot, column: &str) -> Vec<String> {
        snapshot
            .column_cards(&ColumnId::from(column))
            .unwrap_or_default()
            .iter()
            .map(|card| card.id.to_string())
            .collect()
    }

    fn load(columns: &[&str], cards: &[Card], initial: OrderMap) -> Snapshot {
        let records = columns.iter().map(|id| ColumnRecord::new(*id, None)).collect();
        let state = reduce(&Snapshot::new(), Intent::ColumnsLoaded { columns: records }).snapshot;
        reduce(
            &state,
            Intent::CardsLoaded {
                cards: cards.to_vec(),
                order: initial,
            },
        )
        .snapshot
    }

    fn two_columns() -> Snapshot {
        load(
            &["A", "B"],
            &[Card::new("3", None), Card::new("2", None), Card::new("1", None)],
            order(&[
                ("A", Some("1")),
                ("1", Some("2")),
                ("2", Some("A")),
                ("B", Some("3")),
                ("3", Some("B")),
            ]),
        )
    }

    fn with_draft(state: &Snapshot, column: &str, text: &str) -> Snapshot {
        reduce(
            state,
            Intent::SetDraftText {
                column_id: ColumnId::from(column),
                value: text.to_string(),
            },
        )
        .snapshot
    }

    fn add(state: &Snapshot, column: &str, id: &str) -> Transition {
        reduce(
            state,
            Intent::ConfirmAdd {
                column_id: ColumnId::from(column),
                card_id: CardId::from(id),
            },
        )
    }

    fn drag_and_drop(state: &Snapshot, card: &str, to: &str) -> Transition {
        let dragging = reduce(
            state,
            Intent::StartDrag {
                card_id: CardId::from(card),
            },
        )
        .snapshot;
        reduce(&dragging, Intent::Drop { to_id: NodeId::from(to) })
    }

    fn delete(state: &Snapshot, card: &str) -> Transition {
        let deleting = reduce(
            state,
            Intent::RequestDelete {
                card_id: CardId::from(card),
            },
        )
        .snapshot;
        reduce(&deleting, Intent::ConfirmDelete)
    }

    #[test]
    fn test_set_filter() {
        let prev = Snapshot {
            filter_value: "hello".to_string(),
            ..Snapshot::new()
        };
        let next = reduce(
            &prev,
            Intent::SetFilter {
                value: "welcome".to_string(),
            },
        );
        assert_eq!(next.snapshot.filter_value, "welcome");
        assert!(next.commands.is_empty());
        assert_eq!(prev.filter_value, "hello");
    }

    #[test]
    fn test_columns_loaded_only_once() {
        let state = reduce(
            &Snapshot::new(),
            Intent::ColumnsLoaded {
                columns: vec![ColumnRecord::new("A", Some("TODO"))],
            },
        )
        .snapshot;
        let columns = state.columns.as_ref().unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].draft_text, "");

        let again = reduce(
            &state,
            Intent::ColumnsLoaded {
                columns: vec![ColumnRecord::new("B", None)],
            },
        );
        assert!(again.is_noop(&state));
    }

    #[test]
    fn test_cards_loaded_requires_columns() {
        let state = Snapshot::new();
        let next = reduce(
            &state,
            Intent::CardsLoaded {
                cards: vec![Card::new("1", None)],
                order: order(&[("A", Some("1"))]),
            },
        );
        assert!(next.is_noop(&state));
    }

    #[test]
    fn test_cards_loaded_derives_column_lists() {
        let state = two_columns();
        assert_eq!(column_ids(&state, "A"), ["1", "2"]);
        assert_eq!(column_ids(&state, "B"), ["3"]);
    }

    #[test]
    fn test_set_draft_text_unknown_column_is_noop() {
        let state = two_columns();
        let next = reduce(
            &state,
            Intent::SetDraftText {
                column_id: ColumnId::from("Z"),
                value: "x".to_string(),
            },
        );
        assert!(next.is_noop(&state));
    }

    #[test]
    fn test_confirm_add_inserts_at_front() {
        let state = with_draft(&two_columns(), "A", "hello");
        let next = add(&state, "A", "new");

        let expected_patch = patch(&[("A", Some("new")), ("new", Some("1"))]);
        assert_eq!(
            next.commands,
            vec![
                StoreCommand::CreateCard {
                    card: Card::new("new", Some("hello")),
                },
                StoreCommand::PatchOrder {
                    patch: expected_patch.clone(),
                },
            ]
        );
        assert_eq!(next.snapshot.order, state.order.apply(&expected_patch));
        assert_eq!(column_ids(&next.snapshot, "A"), ["new", "1", "2"]);
        assert_eq!(next.snapshot.column(&ColumnId::from("A")).unwrap().draft_text, "");
    }

    #[test]
    fn test_confirm_add_into_empty_column() {
        let state = with_draft(&load(&["A"], &[], order(&[("A", None)])), "A", "x");
        let next = add(&state, "A", "n1");

        assert_eq!(next.snapshot.order, order(&[("A", Some("n1")), ("n1", None)]));
        assert_eq!(column_ids(&next.snapshot, "A"), ["n1"]);
    }

    #[test]
    fn test_confirm_add_with_blank_draft_is_noop() {
        let state = with_draft(&two_columns(), "A", "  \n ");
        assert!(add(&state, "A", "new").is_noop(&state));

        let empty = two_columns();
        assert!(add(&empty, "A", "new").is_noop(&empty));
    }

    #[test]
    fn test_confirm_add_before_cards_loaded_is_noop() {
        let state = reduce(
            &Snapshot::new(),
            Intent::ColumnsLoaded {
                columns: vec![ColumnRecord::new("A", None)],
            },
        )
        .snapshot;
        let state = with_draft(&state, "A", "x");
        assert!(add(&state, "A", "n1").is_noop(&state));
    }

    #[test]
    fn test_confirm_add_rejects_reused_id() {
        let state = with_draft(&two_columns(), "A", "x");
        assert!(add(&state, "A", "2").is_noop(&state));
    }

    #[test]
    fn test_drop_moves_card_across_columns() {
        let state = two_columns();
        let next = drag_and_drop(&state, "1", "3");

        assert_eq!(
            next.commands,
            vec![StoreCommand::PatchOrder {
                patch: patch(&[("A", Some("2")), ("B", Some("1")), ("1", Some("3"))]),
            }]
        );
        assert_eq!(next.snapshot.dragging_card_id, None);
        assert_eq!(column_ids(&next.snapshot, "A"), ["2"]);
        assert_eq!(column_ids(&next.snapshot, "B"), ["1", "3"]);
    }

    #[test]
    fn test_drop_last_card_empties_column() {
        let state = load(
            &["A", "B"],
            &[Card::new("c1", None), Card::new("c2", None)],
            order(&[("A", Some("c1")), ("c1", Some("A")), ("B", Some("c2")), ("c2", Some("B"))]),
        );
        let next = drag_and_drop(&state, "c1", "c2");
        assert_eq!(
            next.snapshot.order,
            order(&[("A", Some("A")), ("c1", Some("c2")), ("B", Some("c1")), ("c2", Some("B"))])
        );
        assert!(column_ids(&next.snapshot, "A").is_empty());
        assert_eq!(column_ids(&next.snapshot, "B"), ["c1", "c2"]);
    }

    #[test]
    fn test_drop_onto_column_appends() {
        let next = drag_and_drop(&two_columns(), "1", "B");
        assert_eq!(column_ids(&next.snapshot, "A"), ["2"]);
        assert_eq!(column_ids(&next.snapshot, "B"), ["3", "1"]);
    }

    #[test]
    fn test_drop_onto_headless_column_links_head() {
        let state = load(
            &["A", "B"],
            &[Card::new("1", None)],
            order(&[("A", Some("1")), ("1", Some("A")), ("B", None)]),
        );
        let next = drag_and_drop(&state, "1", "B");
        assert_eq!(
            next.commands,
            vec![StoreCommand::PatchOrder {
                patch: patch(&[("A", Some("A")), ("B", Some("1")), ("1", Some("B"))]),
            }]
        );
        assert!(column_ids(&next.snapshot, "A").is_empty());
        assert_eq!(column_ids(&next.snapshot, "B"), ["1"]);
    }

    #[test]
    fn test_drop_in_place_clears_drag_without_patch() {
        let next = drag_and_drop(&two_columns(), "1", "2");
        assert!(next.commands.is_empty());
        assert_eq!(next.snapshot.dragging_card_id, None);
        assert_eq!(next.snapshot.order, two_columns().order);
    }

    #[test]
    fn test_drop_preconditions() {
        let state = two_columns();
        let nothing_dragged = reduce(&state, Intent::Drop { to_id: NodeId::from("3") });
        assert!(nothing_dragged.is_noop(&state));

        let dragging = reduce(
            &state,
            Intent::StartDrag {
                card_id: CardId::from("1"),
            },
        )
        .snapshot;
        let onto_self = reduce(&dragging, Intent::Drop { to_id: NodeId::from("1") });
        assert!(onto_self.is_noop(&dragging));

        let unknown_target = reduce(&dragging, Intent::Drop { to_id: NodeId::from("ghost") });
        assert!(unknown_target.is_noop(&dragging));
    }

    #[test]
    fn test_start_drag_unknown_card_is_noop() {
        let state = two_columns();
        let next = reduce(
            &state,
            Intent::StartDrag {
                card_id: CardId::from("ghost"),
            },
        );
        assert!(next.is_noop(&state));
    }

    #[test]
    fn test_end_drag_clears_dragging() {
        let dragging = reduce(
            &two_columns(),
            Intent::StartDrag {
                card_id: CardId::from("2"),
            },
        )
        .snapshot;
        assert_eq!(dragging.dragging_card_id, Some(CardId::from("2")));
        let ended = reduce(&dragging, Intent::EndDrag).snapshot;
        assert_eq!(ended.dragging_card_id, None);
    }

    #[test]
    fn test_confirm_delete_unlinks_and_removes() {
        let state = two_columns();
        let next = delete(&state, "1");
        assert_eq!(
            next.commands,
            vec![
                StoreCommand::PatchOrder {
                    patch: patch(&[("A", Some("2")), ("1", None)]),
                },
                StoreCommand::DeleteCard {
                    id: CardId::from("1"),
                },
            ]
        );
        assert_eq!(next.snapshot.deleting_card_id, None);
        assert!(next.snapshot.card(&CardId::from("1")).is_none());
        assert_eq!(column_ids(&next.snapshot, "A"), ["2"]);
    }

    #[test]
    fn test_cancel_delete() {
        let deleting = reduce(
            &two_columns(),
            Intent::RequestDelete {
                card_id: CardId::from("3"),
            },
        )
        .snapshot;
        let cancelled = reduce(&deleting, Intent::CancelDelete);
        assert_eq!(cancelled.snapshot.deleting_card_id, None);
        assert!(cancelled.commands.is_empty());
        assert!(cancelled.snapshot.card(&CardId::from("3")).is_some());
    }

    #[test]
    fn test_confirm_delete_without_request_is_noop() {
        let state = two_columns();
        assert!(reduce(&state, Intent::ConfirmDelete).is_noop(&state));
    }

    #[test]
    fn test_confirm_delete_of_vanished_card_clears_dialog() {
        let mut state = two_columns();
        state.deleting_card_id = Some(CardId::from("ghost"));
        let next = reduce(&state, Intent::ConfirmDelete);
        assert!(next.commands.is_empty());
        assert_eq!(next.snapshot.deleting_card_id, None);
        assert_eq!(next.snapshot.order, state.order);
    }

    #[test]
    fn test_insert_then_delete_restores_chains() {
        let state = with_draft(&two_columns(), "B", "temp");
        let added = add(&state, "B", "tmp").snapshot;
        assert_eq!(column_ids(&added, "B"), ["tmp", "3"]);

        let removed = delete(&added, "tmp").snapshot;
        for column in ["A", "B"] {
            assert_eq!(column_ids(&removed, column), column_ids(&state, column));
        }
        let linked: Vec<_> = removed.order.iter().filter(|(_, next)| next.is_some()).collect();
        let original: Vec<_> = state.order.iter().filter(|(_, next)| next.is_some()).collect();
        assert_eq!(linked, original);
    }

    #[test]
    fn test_deleted_card_never_reappears() {
        let state = two_columns();
        let mut current = delete(&state, "2").snapshot;
        current = drag_and_drop(&current, "1", "B").snapshot;
        current = drag_and_drop(&current, "3", "A").snapshot;
        for column in ["A", "B"] {
            assert!(!column_ids(&current, column).contains(&"2".to_string()));
        }
        assert!(current.order.iter().all(|(_, next)| next.map(NodeId::as_str) != Some("2")));
    }

    /// Deterministic xorshift so the sequence test needs no extra crates.
    struct Rng(u64);

    impl Rng {
        fn next(&mut self, bound: usize) -> usize {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            (self.0 % bound as u64) as usize
        }
    }

    #[test]
    fn test_random_sequences_keep_chains_intact() {
        let columns = ["A", "B", "C"];
        for seed in 1..=20u64 {
            let mut rng = Rng(seed * 0x9E37_79B9_7F4A_7C15);
            let mut state = load(&columns, &[], order(&[("A", None), ("B", Some("B"))]));
            let mut minted = 0usize;

            for _ in 0..200 {
                let live: Vec<CardId> = state
                    .cards_by_id
                    .as_ref()
                    .map(|cards| cards.keys().cloned().collect())
                    .unwrap_or_default();
                let transition = match rng.next(3) {
                    0 => {
                        let column = columns[rng.next(columns.len())];
                        minted += 1;
                        let drafted = with_draft(&state, column, "card");
                        add(&drafted, column, &format!("n{}", minted))
                    }
                    1 if !live.is_empty() => {
                        let card = live[rng.next(live.len())].to_string();
                        let target = if rng.next(2) == 0 {
                            columns[rng.next(columns.len())].to_string()
                        } else {
                            live[rng.next(live.len())].to_string()
                        };
                        let transition = drag_and_drop(&state, &card, &target);
                        if target != card {
                            let replay = reduce(
                                &reduce(
                                    &transition.snapshot,
                                    Intent::StartDrag {
                                        card_id: CardId::from(card.as_str()),
                                    },
                                )
                                .snapshot,
                                Intent::Drop {
                                    to_id: NodeId::from(target.as_str()),
                                },
                            );
                            assert!(replay.commands.is_empty(), "replayed drop was not idempotent");
                        }
                        transition
                    }
                    _ if !live.is_empty() => delete(&state, live[rng.next(live.len())].as_str()),
                    _ => continue,
                };
                state = transition.snapshot;

                let column_ids: Vec<ColumnId> = columns.iter().map(|id| ColumnId::from(*id)).collect();
                let cards = state.cards_by_id.as_ref().unwrap();
                let issues = audit(&state.order, &column_ids, cards.keys());
                assert!(issues.is_empty(), "seed {}: {:?}", seed, issues);

                let placed: usize = column_ids
                    .iter()
                    .map(|column| state.column_cards(column).unwrap().len())
                    .sum();
                assert_eq!(placed, cards.len(), "seed {}: a live card fell out of every chain", seed);
            }
        }
    }
}
