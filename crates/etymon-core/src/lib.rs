//! etymon-core library.
//!
//! Etymology relationship graph for constructed-language lexicons: internal
//! word-to-word derivations guarded against loops, donor words from other
//! languages, a set-then-commit staging buffer, and the tree codec used to
//! persist it all inside a language document.
//!
//! # Conventions
//!
//! - **Errors**: Narrow `thiserror` types in the library; `anyhow::Result` for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod lexicon;
pub mod lock;
pub mod model;

pub use error::{CodecError, DocumentError, ErrorCode, LoopError};
pub use graph::EtymologyGraph;
pub use lexicon::{Lexicon, Word, WordStore};
pub use model::{ExternalKey, ExternalParent, WordId};
