//! Serializable tree form of an [`EtymologyGraph`].
//!
//! # Shape
//!
//! ```text
//! EtymologyTree
//! ├── relations: one node per parent with at least one live child
//! │     { parent: "<id>", children: ["<id>", ...] }
//! ├── externals: one node per live child with at least one donor word
//! │     { child: "<id>", parents: [{ word, origin, definition }, ...] }
//! └── parent_order: one node per child with two or more live parents
//!       { child: "<id>", parents: ["<id>", ...] }
//! ```
//!
//! Ids are written as decimal text. The parent→child side of the internal
//! index is written in full; the child→parent side is regenerated on load
//! and then put back in its recorded order from `parent_order`. Files
//! without that section load with parents in replay order.
//! The label catalog is never written; loading re-inserts every donor word
//! through the registry add path, which rebuilds it.
//!
//! # Filtering
//!
//! Encoding drops every id the lexicon no longer knows. The in-memory index
//! keeps such stale references until an explicit cascade delete, but they
//! never reach disk.
//!
//! # Loading
//!
//! Internal edges are replayed through the staging buffer, so a
//! loop-creating edge in a hand-edited file is logged and skipped rather
//! than failing the whole load.

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
)]

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::CodecError;
use crate::graph::EtymologyGraph;
use crate::lexicon::Lexicon;
use crate::model::{ExternalParent, WordId};

// ---------------------------------------------------------------------------
// Tree types
// ---------------------------------------------------------------------------

/// The persisted etymology collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtymologyTree {
    #[serde(default)]
    pub relations: Vec<RelationNode>,
    #[serde(default)]
    pub externals: Vec<ChildExternalsNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_order: Vec<ParentOrderNode>,
}

/// A parent and its live children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationNode {
    pub parent: String,
    pub children: Vec<String>,
}

/// A child and its live parents in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentOrderNode {
    pub child: String,
    pub parents: Vec<String>,
}

/// A child and the donor words attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildExternalsNode {
    pub child: String,
    pub parents: Vec<ExternalNode>,
}

/// One donor word: word, origin language, definition, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalNode {
    pub word: String,
    pub origin: String,
    #[serde(default)]
    pub definition: String,
}

impl From<&ExternalParent> for ExternalNode {
    fn from(parent: &ExternalParent) -> Self {
        Self {
            word: parent.word.clone(),
            origin: parent.language.clone(),
            definition: parent.definition.clone(),
        }
    }
}

impl From<&ExternalNode> for ExternalParent {
    fn from(node: &ExternalNode) -> Self {
        Self::new(node.word.clone(), node.origin.clone(), node.definition.clone())
    }
}

impl EtymologyTree {
    /// Serialize to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if serialization fails.
    pub fn to_json(&self, pretty: bool) -> Result<String, CodecError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Parse from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty() && self.externals.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

impl EtymologyGraph {
    /// Build the persisted tree, dropping ids `lexicon` no longer knows.
    pub fn to_tree<L: Lexicon + ?Sized>(&self, lexicon: &L) -> EtymologyTree {
        let mut tree = EtymologyTree::default();

        for (parent, children) in self.relations().iter_parents() {
            if !lexicon.exists(parent) {
                trace!(%parent, "encode: dropping stale parent");
                continue;
            }
            let live: Vec<String> = children
                .iter()
                .filter(|child| lexicon.exists(**child))
                .map(ToString::to_string)
                .collect();
            if live.is_empty() {
                continue;
            }
            tree.relations.push(RelationNode {
                parent: parent.to_string(),
                children: live,
            });
        }

        for (child, parents) in self.relations().iter_children() {
            if !lexicon.exists(child) {
                continue;
            }
            let live: Vec<String> = parents
                .iter()
                .filter(|parent| lexicon.exists(**parent))
                .map(ToString::to_string)
                .collect();
            if live.len() < 2 {
                continue;
            }
            tree.parent_order.push(ParentOrderNode {
                child: child.to_string(),
                parents: live,
            });
        }

        for (child, parents) in self.externals().iter_children() {
            if !lexicon.exists(child) {
                trace!(%child, "encode: dropping donor words of stale child");
                continue;
            }
            let parents: Vec<ExternalNode> = parents.map(ExternalNode::from).collect();
            if parents.is_empty() {
                continue;
            }
            tree.externals.push(ChildExternalsNode {
                child: child.to_string(),
                parents,
            });
        }

        tree
    }

    /// Rebuild a graph from a persisted tree.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidId`] if any id text is not a valid
    /// [`WordId`]. Loop-creating or stale edges are skipped, not errors.
    pub fn from_tree<L: Lexicon + ?Sized>(
        tree: &EtymologyTree,
        lexicon: &L,
    ) -> Result<Self, CodecError> {
        let mut graph = Self::new();

        for node in &tree.relations {
            graph.set_pending_parent(parse_id(&node.parent)?);
            for child in &node.children {
                graph.set_pending_child(parse_id(child)?);
                graph.commit_internal(lexicon);
            }
        }

        for node in &tree.externals {
            graph.set_pending_child(parse_id(&node.child)?);
            for parent in &node.parents {
                graph.staging_mut().set_draft(ExternalParent::from(parent));
                graph.commit_external(lexicon);
            }
        }

        for node in &tree.parent_order {
            let order = node
                .parents
                .iter()
                .map(String::as_str)
                .map(parse_id)
                .collect::<Result<Vec<_>, _>>()?;
            graph.restore_parent_order(parse_id(&node.child)?, &order);
        }

        graph.staging_mut().clear();
        graph.rebuild_catalog();
        Ok(graph)
    }
}

fn parse_id(text: &str) -> Result<WordId, CodecError> {
    text.parse().map_err(|_| CodecError::InvalidId {
        text: text.to_string(),
    })
}
