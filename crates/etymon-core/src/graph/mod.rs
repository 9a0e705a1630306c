//! Etymology relationship graph.
//!
//! ## Submodules
//!
//! - [`relations`]: bidirectional word→word index.
//! - [`external`]: donor-word registry and label catalog.
//! - [`cycles`]: Cycle Guard and lineage walks.
//! - [`staging`]: set-then-commit edit buffer.
//! - [`etymology`]: [`EtymologyGraph`], the aggregate tying them together.

pub mod cycles;
pub mod etymology;
pub mod external;
pub mod relations;
pub mod staging;

pub use etymology::EtymologyGraph;
