use std::fmt;
use std::path::PathBuf;

use crate::lock::LockError;
use crate::model::WordId;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DocumentNotFound,
    ConfigParseError,
    WordNotFound,
    CycleDetected,
    InvalidWordId,
    CorruptDocument,
    DocumentWriteFailed,
    LockContention,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::DocumentNotFound => "E1001",
            Self::ConfigParseError => "E1002",
            Self::WordNotFound => "E2001",
            Self::CycleDetected => "E2003",
            Self::InvalidWordId => "E3001",
            Self::CorruptDocument => "E3002",
            Self::DocumentWriteFailed => "E5001",
            Self::LockContention => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::DocumentNotFound => "Language document not found",
            Self::ConfigParseError => "Config file parse error",
            Self::WordNotFound => "Word not found",
            Self::CycleDetected => "Etymology loop would be created",
            Self::InvalidWordId => "Invalid word id",
            Self::CorruptDocument => "Corrupt language document",
            Self::DocumentWriteFailed => "Document write failed",
            Self::LockContention => "Lock contention",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::DocumentNotFound => Some("Run `ety init` to create a language document."),
            Self::ConfigParseError => Some("Fix syntax in .etymon/config.toml and retry."),
            Self::WordNotFound => Some("Use `ety word list` to see existing word ids."),
            Self::CycleDetected => {
                Some("A word may never appear in its own etymological lineage.")
            }
            Self::InvalidWordId => Some("Word ids are non-negative integers."),
            Self::CorruptDocument => Some("Restore the document from version control or a backup."),
            Self::DocumentWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `ety` process releases its lock."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Rejection of an internal relation that would close a loop.
///
/// `cycle_path` starts at `child`, follows existing parent→child edges to
/// `parent`, and ends at `child` again via the rejected edge. A self relation
/// yields `[id, id]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe_loop(.parent, .child, .cycle_path))]
pub struct LoopError {
    pub parent: WordId,
    pub child: WordId,
    pub cycle_path: Vec<WordId>,
}

impl LoopError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::CycleDetected
    }

    /// Number of distinct words in the loop.
    #[must_use]
    pub fn cycle_len(&self) -> usize {
        self.cycle_path.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_self_relation(&self) -> bool {
        self.parent == self.child
    }
}

fn describe_loop(parent: &WordId, child: &WordId, path: &[WordId]) -> String {
    if parent == child {
        return format!("word {parent} cannot be its own etymological parent");
    }
    let rendered: Vec<String> = path.iter().map(ToString::to_string).collect();
    format!(
        "relation {parent} -> {child} creates an etymology loop: {}",
        rendered.join(" → ")
    )
}

/// Errors decoding a persisted etymology tree.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid word id '{text}' in etymology tree")]
    InvalidId { text: String },

    #[error("malformed etymology JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidId { .. } => ErrorCode::InvalidWordId,
            Self::Json(_) => ErrorCode::CorruptDocument,
        }
    }
}

/// Errors loading or saving a language document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("language document not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Lock(#[from] LockError),
}

impl DocumentError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::DocumentNotFound,
            Self::Read { .. } => ErrorCode::CorruptDocument,
            Self::Write { .. } => ErrorCode::DocumentWriteFailed,
            Self::Codec(err) => err.code(),
            Self::Lock(err) => err.code(),
        }
    }
}
