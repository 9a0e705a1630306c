//! The lexicon collaborator.
//!
//! The etymology graph never creates or destroys lexical entries. All it
//! needs from the lexicon is [`Lexicon::exists`]: internal relations touching
//! a missing id are silently skipped, external relations require the child to
//! exist at insertion time, and serialization drops ids that no longer exist.
//!
//! [`WordStore`] is the in-memory lexicon used by [`LanguageDocument`] and
//! the CLI. Any other store can participate by implementing [`Lexicon`].
//!
//! [`LanguageDocument`]: crate::document::LanguageDocument

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::WordId;

/// Existence oracle consulted by the etymology graph.
pub trait Lexicon {
    /// Returns `true` if `id` names a live lexical entry.
    fn exists(&self, id: WordId) -> bool;
}

impl Lexicon for HashSet<WordId> {
    fn exists(&self, id: WordId) -> bool {
        self.contains(&id)
    }
}

impl Lexicon for BTreeSet<WordId> {
    fn exists(&self, id: WordId) -> bool {
        self.contains(&id)
    }
}

impl<L: Lexicon + ?Sized> Lexicon for &L {
    fn exists(&self, id: WordId) -> bool {
        (**self).exists(id)
    }
}

/// A lexical entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    /// The constructed-language spelling.
    pub value: String,
    #[serde(default)]
    pub definition: String,
}

/// In-memory lexicon keyed by [`WordId`].
///
/// Ids are allocated sequentially starting at 1 and are never reused within
/// a store, even after removal.
#[derive(Debug, Clone, Default)]
pub struct WordStore {
    words: BTreeMap<WordId, Word>,
    next_id: u32,
}

impl WordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new word and return its freshly allocated id.
    pub fn add(&mut self, value: impl Into<String>, definition: impl Into<String>) -> WordId {
        let id = self.allocate();
        self.words.insert(
            id,
            Word {
                id,
                value: value.into(),
                definition: definition.into(),
            },
        );
        id
    }

    /// Insert a word with a caller-chosen id (document loading).
    ///
    /// Replaces any previous word with the same id.
    pub fn insert(&mut self, word: Word) {
        self.next_id = self.next_id.max(word.id.get());
        self.words.insert(word.id, word);
    }

    /// Remove a word, returning it if it existed.
    pub fn remove(&mut self, id: WordId) -> Option<Word> {
        self.words.remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: WordId) -> Option<&Word> {
        self.words.get(&id)
    }

    /// All words in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn allocate(&mut self) -> WordId {
        self.next_id = self.next_id.saturating_add(1);
        WordId::new(self.next_id)
    }
}

impl Lexicon for WordStore {
    fn exists(&self, id: WordId) -> bool {
        self.words.contains_key(&id)
    }
}
