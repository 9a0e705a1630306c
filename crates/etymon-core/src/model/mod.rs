//! Value types shared by the lexicon, the etymology graph, and the codec.

pub mod external;
pub mod word_id;

pub use external::{ExternalKey, ExternalParent};
pub use word_id::WordId;
