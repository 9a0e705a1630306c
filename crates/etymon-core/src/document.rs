//! Language document: a lexicon and its etymology graph, persisted as JSON.
//!
//! One [`LanguageDocument`] owns one [`EtymologyGraph`]; there is no
//! process-wide graph. Deleting a word through the document cascades into
//! the graph so no relation outlives its entry in memory.
//!
//! # File format
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": "2026-01-01T00:00:00Z",
//!   "words": [{ "id": 1, "value": "kal", "definition": "water" }],
//!   "etymology": { "relations": [...], "externals": [...] }
//! }
//! ```
//!
//! Writes go to a sibling temp file first and are renamed into place.

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::codec::EtymologyTree;
use crate::error::{CodecError, DocumentError};
use crate::graph::EtymologyGraph;
use crate::lexicon::{Word, WordStore};
use crate::model::WordId;

/// Current on-disk format version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Serialized form of a [`LanguageDocument`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFile {
    pub version: u32,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub etymology: EtymologyTree,
}

/// A loaded language: lexicon plus etymology.
#[derive(Debug, Clone, Default)]
pub struct LanguageDocument {
    pub words: WordStore,
    pub etymology: EtymologyGraph,
}

impl LanguageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a word to the lexicon.
    pub fn add_word(&mut self, value: impl Into<String>, definition: impl Into<String>) -> WordId {
        self.words.add(value, definition)
    }

    /// Remove a word and every relation touching it.
    ///
    /// Returns the removed word, or `None` if it did not exist.
    pub fn delete_word(&mut self, id: WordId) -> Option<Word> {
        let word = self.words.remove(id)?;
        let dropped = self.etymology.delete_all_for_entry(id);
        debug!(%id, dropped, "word deleted");
        Some(word)
    }

    /// Snapshot into the serializable file form.
    pub fn to_file(&self) -> DocumentFile {
        DocumentFile {
            version: DOCUMENT_VERSION,
            saved_at: Some(Utc::now()),
            words: self.words.iter().cloned().collect(),
            etymology: self.etymology.to_tree(&self.words),
        }
    }

    /// Rebuild from the file form. Words load first so the graph can
    /// consult them.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidId`] if the etymology tree holds an
    /// unparsable id.
    pub fn from_file(file: DocumentFile) -> Result<Self, CodecError> {
        let mut words = WordStore::new();
        for word in file.words {
            words.insert(word);
        }
        let etymology = EtymologyGraph::from_tree(&file.etymology, &words)?;
        Ok(Self { words, etymology })
    }

    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] on malformed JSON or invalid ids.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let file: DocumentFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Serialize to JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if serialization fails.
    pub fn to_json(&self, pretty: bool) -> Result<String, CodecError> {
        let file = self.to_file();
        let json = if pretty {
            serde_json::to_string_pretty(&file)?
        } else {
            serde_json::to_string(&file)?
        };
        Ok(json)
    }

    /// Load a document from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the file is missing,
    /// [`DocumentError::Read`] on I/O failure, and [`DocumentError::Codec`]
    /// on malformed content.
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                DocumentError::NotFound(path.to_path_buf())
            } else {
                DocumentError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let doc = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            words = doc.words.len(),
            relations = doc.etymology.relations().edge_count(),
            "document loaded"
        );
        Ok(doc)
    }

    /// Write the document to `path` atomically.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Write`] on I/O failure.
    pub fn save(&self, path: &Path, pretty: bool) -> Result<(), DocumentError> {
        let json = self.to_json(pretty)?;
        let tmp = temp_path_for(path);
        let write_err = |source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, path).map_err(write_err)?;

        info!(path = %path.display(), words = self.words.len(), "document saved");
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
