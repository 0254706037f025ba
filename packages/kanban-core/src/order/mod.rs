/// Per-column card order, stored as one flat map of circular singly-linked
/// lists.
///
/// For a column `C` holding `[c1, c2, c3]` the map contains
/// `C → c1, c1 → c2, c2 → c3, c3 → C`. An empty column maps to itself, to
/// `null`, or has no entry at all.
pub mod audit;
pub mod engine;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::NodeId;

/// The authoritative successor map shared by all columns.
///
/// An explicit `null` successor and a missing key both end a chain, but they
/// stay distinguishable: the wire format sends `"k": null` for the former.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderMap(BTreeMap<NodeId, Option<NodeId>>);

/// A partial order map: the key-wise overwrites produced by one edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderPatch(BTreeMap<NodeId, Option<NodeId>>);

impl OrderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successor of `id`, treating a missing entry like `null`.
    pub fn successor(&self, id: &NodeId) -> Option<&NodeId> {
        self.0.get(id).and_then(Option::as_ref)
    }

    /// The raw entry for `id`: `None` when the key is absent,
    /// `Some(None)` when it is stored as `null`.
    pub fn entry(&self, id: &NodeId) -> Option<Option<&NodeId>> {
        self.0.get(id).map(Option::as_ref)
    }

    /// First key (in key order) whose successor is `id`.
    pub fn predecessor(&self, id: &NodeId) -> Option<&NodeId> {
        self.0
            .iter()
            .find(|(_, next)| next.as_ref() == Some(id))
            .map(|(key, _)| key)
    }

    pub fn insert(&mut self, id: NodeId, next: Option<NodeId>) {
        self.0.insert(id, next);
    }

    pub fn contains_key(&self, id: &NodeId) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, Option<&NodeId>)> {
        self.0.iter().map(|(key, next)| (key, next.as_ref()))
    }

    /// Merge `patch` into this map in place (key-wise overwrite).
    pub fn merge(&mut self, patch: &OrderPatch) {
        for (key, next) in &patch.0 {
            self.0.insert(key.clone(), next.clone());
        }
    }

    /// A new map with `patch` merged in; `self` is left untouched.
    pub fn apply(&self, patch: &OrderPatch) -> Self {
        let mut next = self.clone();
        next.merge(patch);
        next
    }
}

impl OrderPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id → next`, overwriting any earlier write to the same key.
    pub fn set(&mut self, id: NodeId, next: Option<NodeId>) {
        self.0.insert(id, next);
    }

    pub fn get(&self, id: &NodeId) -> Option<Option<&NodeId>> {
        self.0.get(id).map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, Option<&NodeId>)> {
        self.0.iter().map(|(key, next)| (key, next.as_ref()))
    }
}

impl<K: Into<NodeId>, V: Into<NodeId>> FromIterator<(K, Option<V>)> for OrderMap {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, next)| (key.into(), next.map(Into::into)))
                .collect(),
        )
    }
}

impl<K: Into<NodeId>, V: Into<NodeId>> FromIterator<(K, Option<V>)> for OrderPatch {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, next)| (key.into(), next.map(Into::into)))
                .collect(),
        )
    }
}
