//! External Parent Registry: word-to-donor-word relations.
//!
//! # Data Model
//!
//! - `by_child`: child → (key → record). One record per key per child; a
//!   second insert under the same key replaces the record.
//! - `children_by_key`: key → children, insertion order, no duplicates.
//! - `catalog`: sorted, deduplicated display labels of every key that still
//!   has at least one child.
//!
//! The first two maps describe the same relation set from opposite ends and
//! are mutated only through [`ExternalRegistry::insert`] and
//! [`ExternalRegistry::remove`].
//!
//! The registry does not consult the lexicon; [`EtymologyGraph`] checks that
//! the child exists before inserting. Reads tolerate orphaned children whose
//! entry was deleted after insertion.
//!
//! [`EtymologyGraph`]: crate::graph::etymology::EtymologyGraph

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
)]

use std::collections::{BTreeMap, BTreeSet, btree_map};

use crate::model::{ExternalKey, ExternalParent, WordId};

/// Per-child donor-word records plus a reverse index and a label catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalRegistry {
    by_child: BTreeMap<WordId, BTreeMap<ExternalKey, ExternalParent>>,
    children_by_key: BTreeMap<ExternalKey, Vec<WordId>>,
    catalog: BTreeSet<String>,
}

impl ExternalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `parent` to `child`.
    ///
    /// Returns the record previously stored under the same key for this
    /// child, if any.
    pub(crate) fn insert(&mut self, parent: ExternalParent, child: WordId) -> Option<ExternalParent> {
        let key = parent.key();

        let kids = self.children_by_key.entry(key.clone()).or_default();
        if !kids.contains(&child) {
            kids.push(child);
        }

        self.catalog.insert(parent.label());
        self.by_child.entry(child).or_default().insert(key, parent)
    }

    /// Detach the record with `key` from `child`. No-op if absent.
    pub(crate) fn remove(&mut self, key: &ExternalKey, child: WordId) -> Option<ExternalParent> {
        if let Some(kids) = self.children_by_key.get_mut(key) {
            kids.retain(|c| *c != child);
            if kids.is_empty() {
                self.children_by_key.remove(key);
                self.retire_label(key);
            }
        }

        let records = self.by_child.get_mut(&child)?;
        let removed = records.remove(key);
        if records.is_empty() {
            self.by_child.remove(&child);
        }
        removed
    }

    /// Detach every record from `child`. Returns how many were removed.
    pub(crate) fn remove_child(&mut self, child: WordId) -> usize {
        let keys: Vec<ExternalKey> = self
            .by_child
            .get(&child)
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default();

        keys.iter()
            .filter(|key| self.remove(key, child).is_some())
            .count()
    }

    /// Records attached to `child`, ordered by key. Empty if none.
    pub fn parents_of(&self, child: WordId) -> Vec<&ExternalParent> {
        self.by_child
            .get(&child)
            .map(|records| records.values().collect())
            .unwrap_or_default()
    }

    /// The record stored under `key` for `child`.
    pub fn get(&self, key: &ExternalKey, child: WordId) -> Option<&ExternalParent> {
        self.by_child.get(&child).and_then(|records| records.get(key))
    }

    /// Children carrying a record with `key`, in insertion order.
    pub fn children_of(&self, key: &ExternalKey) -> &[WordId] {
        self.children_by_key
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every distinct key currently attached to at least one child.
    pub fn keys(&self) -> impl Iterator<Item = &ExternalKey> {
        self.children_by_key.keys()
    }

    /// Iterate `(child, records)` in ascending child order.
    pub fn iter_children(
        &self,
    ) -> impl Iterator<Item = (WordId, btree_map::Values<'_, ExternalKey, ExternalParent>)> {
        self.by_child
            .iter()
            .map(|(child, records)| (*child, records.values()))
    }

    /// Sorted, deduplicated display labels.
    pub fn catalog(&self) -> Vec<&str> {
        self.catalog.iter().map(String::as_str).collect()
    }

    /// Regenerate the catalog from the live reverse index.
    pub fn rebuild_catalog(&mut self) {
        self.catalog = self.children_by_key.keys().map(ExternalKey::label).collect();
    }

    /// Number of (child, key) relations.
    pub fn relation_count(&self) -> usize {
        self.by_child.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_child.is_empty()
    }

    /// Check that the per-child map and the reverse index agree.
    pub fn is_consistent(&self) -> bool {
        let mut forward: Vec<(&ExternalKey, WordId)> = self
            .by_child
            .iter()
            .flat_map(|(child, records)| records.keys().map(move |k| (k, *child)))
            .collect();
        let mut reverse: Vec<(&ExternalKey, WordId)> = self
            .children_by_key
            .iter()
            .flat_map(|(key, kids)| kids.iter().map(move |c| (key, *c)))
            .collect();
        forward.sort_unstable();
        reverse.sort_unstable();
        forward == reverse
    }

    /// Drop `key`'s label unless another live key renders identically.
    fn retire_label(&mut self, key: &ExternalKey) {
        let label = key.label();
        let still_used = self.children_by_key.keys().any(|k| k.label() == label);
        if !still_used {
            self.catalog.remove(&label);
        }
    }
}
