//! Locating the project and its language document, and running guarded
//! read or read-modify-write cycles against it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use etymon_core::config::{self, EffectiveConfig, PROJECT_DIR};
use etymon_core::document::LanguageDocument;
use etymon_core::error::{DocumentError, ErrorCode};
use etymon_core::lock::{DocumentLock, DocumentReadLock};
use etymon_core::model::WordId;
use tracing::debug;

use crate::output::{CliError, OutputMode, fail};

/// A resolved project: root directory, effective config, document path.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub config: EffectiveConfig,
    pub document: PathBuf,
}

impl Project {
    /// Find the nearest `.etymon/` at or above `start` and load its config.
    ///
    /// Without one, `start` itself is the root and defaults apply.
    /// `doc_override` replaces the configured document path.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn discover(start: &Path, doc_override: Option<&Path>, cli_json: bool) -> anyhow::Result<Self> {
        let root = find_project_root(start).unwrap_or_else(|| start.to_path_buf());
        let config = config::resolve_config(&root, cli_json)?;
        let document = doc_override.map_or_else(
            || config.project.document.resolve_path(&root),
            |path| start.join(path),
        );
        debug!(root = %root.display(), document = %document.display(), "project resolved");
        Ok(Self {
            root,
            config,
            document,
        })
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    pub const fn lock_timeout(&self) -> Duration {
        self.config.project.document.lock_timeout()
    }

    pub const fn pretty(&self) -> bool {
        self.config.project.document.pretty
    }

    /// Load the document under a shared lock.
    ///
    /// # Errors
    ///
    /// Renders and returns [`DocumentError`]s.
    pub fn load(&self, mode: OutputMode) -> anyhow::Result<LanguageDocument> {
        let lock = DocumentReadLock::acquire(&self.document, self.lock_timeout())
            .map_err(|e| document_failure(mode, &DocumentError::from(e)))?;
        let doc = LanguageDocument::open(&self.document).map_err(|e| document_failure(mode, &e))?;
        lock.release();
        Ok(doc)
    }

    /// Run `edit` against the document under an exclusive lock and save the
    /// result. Nothing is written if `edit` fails.
    ///
    /// # Errors
    ///
    /// Renders and returns [`DocumentError`]s; passes through errors from `edit`.
    pub fn edit<T>(
        &self,
        mode: OutputMode,
        edit: impl FnOnce(&mut LanguageDocument) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let lock = DocumentLock::acquire(&self.document, self.lock_timeout())
            .map_err(|e| document_failure(mode, &DocumentError::from(e)))?;
        let mut doc =
            LanguageDocument::open(&self.document).map_err(|e| document_failure(mode, &e))?;

        let value = edit(&mut doc)?;

        doc.save(&self.document, self.pretty())
            .map_err(|e| document_failure(mode, &e))?;
        lock.release();
        Ok(value)
    }
}

/// Fail with [`ErrorCode::WordNotFound`] unless `id` is in `doc`.
///
/// # Errors
///
/// Renders and returns the not-found error.
pub fn require_word(doc: &LanguageDocument, id: WordId, mode: OutputMode) -> anyhow::Result<()> {
    if doc.words.get(id).is_some() {
        return Ok(());
    }
    Err(fail(
        mode,
        &CliError::with_code(format!("word {id} does not exist"), ErrorCode::WordNotFound),
    ))
}

fn document_failure(mode: OutputMode, err: &DocumentError) -> anyhow::Error {
    fail(mode, &CliError::from(err))
}

fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(PROJECT_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}
