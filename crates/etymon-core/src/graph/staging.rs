//! Edit Staging Buffer for two-phase "set then commit" editing.
//!
//! Editors stage a parent id, a child id, and a draft external parent
//! through discrete setters, then ask [`EtymologyGraph`] to commit. The
//! buffer only holds values; the commit logic lives on the graph so that
//! it runs through the same guarded add paths as direct calls.
//!
//! The pending parent survives an internal commit so a single parent can be
//! related to several children in one session. The draft external parent is
//! reset after every external commit.
//!
//! [`EtymologyGraph`]: crate::graph::etymology::EtymologyGraph

use crate::model::{ExternalParent, WordId};

/// Pending values for the next commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingBuffer {
    parent: Option<WordId>,
    child: Option<WordId>,
    draft: ExternalParent,
}

impl StagingBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parent(&mut self, parent: WordId) {
        self.parent = Some(parent);
    }

    pub fn set_child(&mut self, child: WordId) {
        self.child = Some(child);
    }

    pub fn set_draft(&mut self, draft: ExternalParent) {
        self.draft = draft;
    }

    #[must_use]
    pub const fn parent(&self) -> Option<WordId> {
        self.parent
    }

    #[must_use]
    pub const fn child(&self) -> Option<WordId> {
        self.child
    }

    #[must_use]
    pub const fn draft(&self) -> &ExternalParent {
        &self.draft
    }

    /// Edit the draft in place.
    pub fn draft_mut(&mut self) -> &mut ExternalParent {
        &mut self.draft
    }

    /// Hand out the draft and leave an empty record behind.
    pub(crate) fn take_draft(&mut self) -> ExternalParent {
        std::mem::take(&mut self.draft)
    }

    /// Reset every pending value.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
