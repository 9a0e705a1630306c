//! Externally-sourced donor words.
//!
//! An [`ExternalParent`] describes a word from another (often real-world)
//! language that a lexicon entry was borrowed or derived from. External
//! parents are not lexicon entries and never have parents of their own.
//!
//! Identity is the composite [`ExternalKey`] `{word, language}`. The display
//! label `"<word> (<language>)"` is carried alongside for catalogs and
//! autocomplete, but is never used as a key: two different keys may render
//! to the same label when the text itself contains parentheses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A donor word record attached to a lexicon entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalParent {
    /// The donor word as written in its source language.
    pub word: String,
    /// Name of the source language.
    pub language: String,
    /// Free-form gloss of the donor word.
    #[serde(default)]
    pub definition: String,
}

impl ExternalParent {
    pub fn new(
        word: impl Into<String>,
        language: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            language: language.into(),
            definition: definition.into(),
        }
    }

    /// Identity key of this record.
    #[must_use]
    pub fn key(&self) -> ExternalKey {
        ExternalKey {
            word: self.word.clone(),
            language: self.language.clone(),
        }
    }

    /// Catalog label: `"<word> (<language>)"`.
    #[must_use]
    pub fn label(&self) -> String {
        display_label(&self.word, &self.language)
    }
}

/// Composite identity of an external parent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExternalKey {
    pub word: String,
    pub language: String,
}

impl ExternalKey {
    pub fn new(word: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            language: language.into(),
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        display_label(&self.word, &self.language)
    }
}

impl fmt::Display for ExternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.word, self.language)
    }
}

fn display_label(word: &str, language: &str) -> String {
    format!("{word} ({language})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_format() {
        let p = ExternalParent::new("aqua", "Latin", "water");
        assert_eq!(p.label(), "aqua (Latin)");
        assert_eq!(p.key().label(), "aqua (Latin)");
        assert_eq!(p.key().to_string(), "aqua (Latin)");
    }

    #[test]
    fn definition_is_not_part_of_identity() {
        let a = ExternalParent::new("aqua", "Latin", "water");
        let b = ExternalParent::new("aqua", "Latin", "rain");
        assert_eq!(a.key(), b.key());
        assert_ne!(a, b);
    }

    #[test]
    fn keys_stay_distinct_when_labels_collide() {
        let a = ExternalKey::new("a (b", "c");
        let b = ExternalKey::new("a", "b (c");
        assert_eq!(a.label(), b.label());
        assert_ne!(a, b);
    }
}
