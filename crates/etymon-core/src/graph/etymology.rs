//! The etymology relationship graph of one language document.
//!
//! [`EtymologyGraph`] owns the four cooperating structures:
//!
//! - the internal [`RelationIndex`] (word → word, both directions),
//! - the [`ExternalRegistry`] (word ← donor word, plus label catalog),
//! - the Cycle Guard ([`cycles`](super::cycles)), consulted before every
//!   internal insert,
//! - the [`StagingBuffer`] for set-then-commit editing.
//!
//! # Permissiveness
//!
//! The only error is [`LoopError`] from [`EtymologyGraph::add_relation`].
//! References to ids the lexicon does not know are silent no-ops for
//! internal relations and a precondition for external ones. Removing
//! something that is not there is a no-op. Lookups never fail; they return
//! empty slices.
//!
//! # Usage
//!
//! ```rust
//! use etymon_core::graph::EtymologyGraph;
//! use etymon_core::lexicon::WordStore;
//!
//! let mut words = WordStore::new();
//! let root = words.add("kal", "water");
//! let derived = words.add("kalan", "river");
//!
//! let mut graph = EtymologyGraph::new();
//! graph.add_relation(&words, root, derived).expect("no loop");
//! assert_eq!(graph.children(root), &[derived]);
//! assert!(graph.add_relation(&words, derived, root).is_err());
//! ```

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
)]

use tracing::{debug, warn};

use super::cycles;
use super::external::ExternalRegistry;
use super::relations::RelationIndex;
use super::staging::StagingBuffer;
use crate::error::LoopError;
use crate::lexicon::Lexicon;
use crate::model::{ExternalKey, ExternalParent, WordId};

/// Internal and external etymology relations with a staging buffer.
#[derive(Debug, Clone, Default)]
pub struct EtymologyGraph {
    relations: RelationIndex,
    externals: ExternalRegistry,
    staging: StagingBuffer,
}

impl EtymologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Internal relations
    // -----------------------------------------------------------------------

    /// Record that `child` derives from `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`LoopError`] if `parent == child` or if the edge would put a
    /// word into its own lineage. The loop check runs before the existence
    /// check, so a self relation is rejected even for unknown ids.
    ///
    /// If either id is unknown to `lexicon` the call is a silent no-op.
    pub fn add_relation<L: Lexicon + ?Sized>(
        &mut self,
        lexicon: &L,
        parent: WordId,
        child: WordId,
    ) -> Result<(), LoopError> {
        if let Some(err) = self.check_relation(lexicon, parent, child) {
            debug!(%parent, %child, cycle_len = err.cycle_len(), "relation rejected");
            return Err(err);
        }

        if !lexicon.exists(parent) || !lexicon.exists(child) {
            debug!(%parent, %child, "relation skipped: word not in lexicon");
            return Ok(());
        }

        if self.relations.link(parent, child) {
            debug!(%parent, %child, "relation added");
        }
        Ok(())
    }

    /// Children of `id` in insertion order; empty if none.
    pub fn children(&self, id: WordId) -> &[WordId] {
        self.relations.children(id)
    }

    /// Parents of `id` in insertion order; empty if none.
    pub fn parents(&self, id: WordId) -> &[WordId] {
        self.relations.parents(id)
    }

    /// Internal parent ids of `child`. Same as [`EtymologyGraph::parents`].
    pub fn word_parent_ids(&self, child: WordId) -> &[WordId] {
        self.relations.parents(child)
    }

    /// Remove `parent → child` if recorded. Never errors.
    pub fn del_relation(&mut self, parent: WordId, child: WordId) {
        if self.relations.unlink(parent, child) {
            debug!(%parent, %child, "relation removed");
        }
    }

    /// Drop every relation touching `id` after its entry left the lexicon.
    ///
    /// Removes internal edges where `id` is parent or child, and every
    /// external parent attached to `id`. Returns the number of relations
    /// removed.
    pub fn delete_all_for_entry(&mut self, id: WordId) -> usize {
        let internal = self.relations.remove_word(id);
        let external = self.externals.remove_child(id);
        debug!(%id, internal, external, "cascaded relation delete");
        internal + external
    }

    /// Would recording `parent → child` close a loop?
    ///
    /// Only words `lexicon` still knows count as links in the chain.
    pub fn creates_loop<L: Lexicon + ?Sized>(
        &self,
        lexicon: &L,
        parent: WordId,
        child: WordId,
    ) -> bool {
        self.check_relation(lexicon, parent, child).is_some()
    }

    /// Like [`EtymologyGraph::creates_loop`], but returns the loop itself.
    pub fn check_relation<L: Lexicon + ?Sized>(
        &self,
        lexicon: &L,
        parent: WordId,
        child: WordId,
    ) -> Option<LoopError> {
        cycles::creates_loop_within(&self.relations, parent, child, |id| lexicon.exists(id))
    }

    /// Every ancestor of `id`, nearest first.
    pub fn ancestors(&self, id: WordId) -> Vec<WordId> {
        cycles::ancestors(&self.relations, id)
    }

    /// Every descendant of `id`, nearest first.
    pub fn descendants(&self, id: WordId) -> Vec<WordId> {
        cycles::descendants(&self.relations, id)
    }

    // -----------------------------------------------------------------------
    // External relations
    // -----------------------------------------------------------------------

    /// Attach a donor word to `child`. No-op if `child` is not in `lexicon`.
    ///
    /// A record with the same key already on `child` is replaced.
    pub fn add_external_relation<L: Lexicon + ?Sized>(
        &mut self,
        lexicon: &L,
        parent: ExternalParent,
        child: WordId,
    ) {
        if !lexicon.exists(child) {
            debug!(%child, "external relation skipped: word not in lexicon");
            return;
        }

        let key = parent.key();
        if self.externals.insert(parent, child).is_some() {
            debug!(%child, %key, "external relation replaced");
        } else {
            debug!(%child, %key, "external relation added");
        }
    }

    /// Detach the donor word `key` from `child`. No-op if absent.
    pub fn del_external_relation(&mut self, key: &ExternalKey, child: WordId) {
        if self.externals.remove(key, child).is_some() {
            debug!(%child, %key, "external relation removed");
        }
    }

    /// Donor words attached to `child`, ordered by key; empty if none.
    pub fn word_external_parents(&self, child: WordId) -> Vec<&ExternalParent> {
        self.externals.parents_of(child)
    }

    /// Words carrying the donor word `key`; empty if none.
    pub fn children_for(&self, key: &ExternalKey) -> &[WordId] {
        self.externals.children_of(key)
    }

    /// Sorted labels of every donor word used in the language.
    pub fn external_catalog(&self) -> Vec<&str> {
        self.externals.catalog()
    }

    /// Regenerate the catalog from the live registry, dropping stale labels.
    pub fn rebuild_catalog(&mut self) {
        self.externals.rebuild_catalog();
    }

    // -----------------------------------------------------------------------
    // Staging
    // -----------------------------------------------------------------------

    pub fn staging(&self) -> &StagingBuffer {
        &self.staging
    }

    pub fn staging_mut(&mut self) -> &mut StagingBuffer {
        &mut self.staging
    }

    pub fn set_pending_parent(&mut self, parent: WordId) {
        self.staging.set_parent(parent);
    }

    pub fn set_pending_child(&mut self, child: WordId) {
        self.staging.set_child(child);
    }

    /// Edit the draft external parent in place.
    pub fn draft_external_mut(&mut self) -> &mut ExternalParent {
        self.staging.draft_mut()
    }

    /// Relate the pending parent to the pending child.
    ///
    /// The pending parent is kept for the next commit. A [`LoopError`] is
    /// logged and swallowed; callers wanting to surface it should validate
    /// with [`EtymologyGraph::check_relation`] or call
    /// [`EtymologyGraph::add_relation`] directly.
    pub fn commit_internal<L: Lexicon + ?Sized>(&mut self, lexicon: &L) {
        let (Some(parent), Some(child)) = (self.staging.parent(), self.staging.child()) else {
            debug!("internal commit skipped: parent or child not staged");
            return;
        };

        if let Err(err) = self.add_relation(lexicon, parent, child) {
            warn!(%parent, %child, error = %err, "staged relation dropped");
        }
    }

    /// Attach the draft external parent to the pending child, then reset
    /// the draft to an empty record.
    pub fn commit_external<L: Lexicon + ?Sized>(&mut self, lexicon: &L) {
        let draft = self.staging.take_draft();
        match self.staging.child() {
            Some(child) => self.add_external_relation(lexicon, draft, child),
            None => debug!("external commit skipped: child not staged"),
        }
    }

    /// Restore the persisted order of `child`'s parent list.
    pub(crate) fn restore_parent_order(&mut self, child: WordId, order: &[WordId]) {
        self.relations.reorder_parents(child, order);
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    pub fn relations(&self) -> &RelationIndex {
        &self.relations
    }

    pub fn externals(&self) -> &ExternalRegistry {
        &self.externals
    }

    /// Check that both bidirectional indices are internally consistent.
    pub fn is_consistent(&self) -> bool {
        self.relations.is_consistent() && self.externals.is_consistent()
    }
}
