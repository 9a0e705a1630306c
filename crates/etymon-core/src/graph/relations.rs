//! Bidirectional index of internal (word-to-word) derivation edges.
//!
//! # Data Model
//!
//! Every edge `parent → child` is stored twice:
//!
//! - `children[parent]`: children in insertion order, no duplicates
//! - `parents[child]`: parents in insertion order, no duplicates
//!
//! An edge exists in one map iff it exists in the other. The only mutators
//! are [`RelationIndex::link`], [`RelationIndex::unlink`] and
//! [`RelationIndex::remove_word`], each of which updates both sides in the
//! same call.
//!
//! The index knows nothing about the lexicon or the no-loop rule;
//! [`EtymologyGraph`] consults both before calling [`RelationIndex::link`].
//!
//! [`EtymologyGraph`]: crate::graph::etymology::EtymologyGraph

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
)]

use std::collections::BTreeMap;

use crate::model::WordId;

/// Parent→children and child→parents adjacency lists kept in lockstep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationIndex {
    /// parent → children, in insertion order.
    children: BTreeMap<WordId, Vec<WordId>>,
    /// child → parents, in insertion order.
    parents: BTreeMap<WordId, Vec<WordId>>,
}

impl RelationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Children of `id`, or an empty slice if none are recorded.
    pub fn children(&self, id: WordId) -> &[WordId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Parents of `id`, or an empty slice if none are recorded.
    pub fn parents(&self, id: WordId) -> &[WordId] {
        self.parents.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Return `true` if the edge `parent → child` is recorded.
    pub fn contains(&self, parent: WordId, child: WordId) -> bool {
        self.children(parent).contains(&child)
    }

    /// Record `parent → child` on both sides. Idempotent.
    ///
    /// Returns `true` if the edge was not already present.
    pub(crate) fn link(&mut self, parent: WordId, child: WordId) -> bool {
        let added_down = push_unique(self.children.entry(parent).or_default(), child);
        let added_up = push_unique(self.parents.entry(child).or_default(), parent);
        debug_assert_eq!(added_down, added_up, "relation index sides diverged");
        added_down
    }

    /// Remove `parent → child` from both sides. No-op if absent.
    ///
    /// Returns `true` if the edge existed.
    pub(crate) fn unlink(&mut self, parent: WordId, child: WordId) -> bool {
        let removed_down = remove_from(&mut self.children, parent, child);
        let removed_up = remove_from(&mut self.parents, child, parent);
        debug_assert_eq!(removed_down, removed_up, "relation index sides diverged");
        removed_down
    }

    /// Remove every edge touching `id`, as parent or as child.
    ///
    /// Returns the number of edges removed.
    pub(crate) fn remove_word(&mut self, id: WordId) -> usize {
        let mut removed = 0;
        for child in self.children(id).to_vec() {
            if self.unlink(id, child) {
                removed += 1;
            }
        }
        for parent in self.parents(id).to_vec() {
            if self.unlink(parent, id) {
                removed += 1;
            }
        }
        removed
    }

    /// Iterate `(parent, children)` entries in ascending parent order.
    ///
    /// Parents whose child list became empty after deletions are skipped.
    pub fn iter_parents(&self) -> impl Iterator<Item = (WordId, &[WordId])> {
        self.children
            .iter()
            .filter(|(_, kids)| !kids.is_empty())
            .map(|(parent, kids)| (*parent, kids.as_slice()))
    }

    /// Iterate `(child, parents)` entries in ascending child order.
    pub fn iter_children(&self) -> impl Iterator<Item = (WordId, &[WordId])> {
        self.parents
            .iter()
            .filter(|(_, ps)| !ps.is_empty())
            .map(|(child, ps)| (*child, ps.as_slice()))
    }

    /// Put the parents of `child` listed in `order` first, in that order.
    ///
    /// Ids in `order` that are not parents of `child` are ignored; unlisted
    /// parents follow in their current order. Membership never changes, so
    /// both sides stay in agreement.
    pub(crate) fn reorder_parents(&mut self, child: WordId, order: &[WordId]) {
        let Some(list) = self.parents.get_mut(&child) else {
            return;
        };
        let mut reordered: Vec<WordId> = Vec::with_capacity(list.len());
        for id in order.iter().chain(list.iter()) {
            if list.contains(id) && !reordered.contains(id) {
                reordered.push(*id);
            }
        }
        *list = reordered;
    }

    /// Total number of recorded edges.
    pub fn edge_count(&self) -> usize {
        self.children.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    /// Check that both sides describe exactly the same edge set.
    pub fn is_consistent(&self) -> bool {
        let down = self
            .children
            .iter()
            .flat_map(|(p, kids)| kids.iter().map(move |c| (*p, *c)));
        let up = self
            .parents
            .iter()
            .flat_map(|(c, ps)| ps.iter().map(move |p| (*p, *c)));

        let mut down: Vec<_> = down.collect();
        let mut up: Vec<_> = up.collect();
        down.sort_unstable();
        up.sort_unstable();
        down == up
    }

    #[cfg(test)]
    pub(crate) fn parents_mut_for_tests(&mut self) -> &mut BTreeMap<WordId, Vec<WordId>> {
        &mut self.parents
    }
}

fn push_unique(list: &mut Vec<WordId>, id: WordId) -> bool {
    if list.contains(&id) {
        false
    } else {
        list.push(id);
        true
    }
}

fn remove_from(map: &mut BTreeMap<WordId, Vec<WordId>>, key: WordId, id: WordId) -> bool {
    let Some(list) = map.get_mut(&key) else {
        return false;
    };
    let Some(pos) = list.iter().position(|x| *x == id) else {
        return false;
    };
    list.remove(pos);
    if list.is_empty() {
        map.remove(&key);
    }
    true
}
