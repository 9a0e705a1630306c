//! Cycle Guard for internal etymology edges.
//!
//! # Overview
//!
//! A word may never appear in its own etymological lineage. Before an edge
//! `parent → child` is recorded, [`creates_loop`] walks the existing index
//! and rejects the edge when:
//!
//! 1. `parent == child` (degenerate loop), or
//! 2. `child` is an ancestor of `parent` (upward walk from `parent` over the
//!    child→parent side reaches `child`), or
//! 3. `parent` is a descendant of `child` (downward walk from `child` over the
//!    parent→child side reaches `parent`).
//!
//! With a consistent index, checks 2 and 3 are equivalent; both run so that
//! each side of the index vouches for the other.
//!
//! # Design
//!
//! - **BFS transitive closure**: each walk explores every reachable node
//!   exactly once and stops the moment the target is seen.
//! - **Pure**: nothing here mutates the index.
//! - **O(V+E)** per walk.

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::doc_markdown,
)]

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::trace;

use super::relations::RelationIndex;
use crate::error::LoopError;
use crate::model::WordId;

// ---------------------------------------------------------------------------
// Core detection
// ---------------------------------------------------------------------------

/// Decide whether recording `parent → child` would close a loop.
///
/// Returns the [`LoopError`] describing the loop, or `None` if the edge is
/// safe. The error's `cycle_path` runs `child → … → parent → child`.
pub fn creates_loop(index: &RelationIndex, parent: WordId, child: WordId) -> Option<LoopError> {
    creates_loop_within(index, parent, child, |_| true)
}

/// Like [`creates_loop`], but the walks only pass through ids for which
/// `live` holds.
///
/// Stale ids left in the index by a lexicon delete without a cascade never
/// reach disk, so a loop that only closes through them would disappear on
/// the next reload. Skipping them keeps the verdict the same before and
/// after a reload.
pub fn creates_loop_within(
    index: &RelationIndex,
    parent: WordId,
    child: WordId,
    live: impl Fn(WordId) -> bool,
) -> Option<LoopError> {
    if parent == child {
        return Some(LoopError {
            parent,
            child,
            cycle_path: vec![parent, parent],
        });
    }

    if !live(parent) || !live(child) {
        return None;
    }

    // Upward: is `child` among the ancestors of `parent`?
    if let Some(mut up) = find_path(parent, child, |id| index.parents(id), &live) {
        trace!(%parent, %child, "cycle guard: child is an ancestor of parent");
        // up = parent → … → child (climbing); flip to read top-down.
        up.reverse();
        up.push(child);
        return Some(LoopError {
            parent,
            child,
            cycle_path: up,
        });
    }

    // Downward: is `parent` among the descendants of `child`?
    if let Some(mut down) = find_path(child, parent, |id| index.children(id), &live) {
        trace!(%parent, %child, "cycle guard: parent is a descendant of child");
        down.push(child);
        return Some(LoopError {
            parent,
            child,
            cycle_path: down,
        });
    }

    None
}

/// Every ancestor of `id` (transitively), nearest first. Excludes `id`.
pub fn ancestors(index: &RelationIndex, id: WordId) -> Vec<WordId> {
    closure(id, |w| index.parents(w))
}

/// Every descendant of `id` (transitively), nearest first. Excludes `id`.
pub fn descendants(index: &RelationIndex, id: WordId) -> Vec<WordId> {
    closure(id, |w| index.children(w))
}

/// Check whether the index contains any loop at all.
///
/// Guarded inserts keep this `false`; it exists to validate indexes
/// assembled by other means.
pub fn has_cycles(index: &RelationIndex) -> bool {
    let mut color: HashMap<WordId, Color> = HashMap::new();

    for (parent, _) in index.iter_parents() {
        if color.get(&parent).copied().unwrap_or(Color::White) == Color::White
            && dfs_has_cycle(index, parent, &mut color)
        {
            return true;
        }
    }

    false
}

// ---------------------------------------------------------------------------
// Walk internals
// ---------------------------------------------------------------------------

/// DFS colors for loop detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited.
    White,
    /// Currently on the DFS stack.
    Gray,
    /// Fully processed.
    Black,
}

/// BFS from `start` looking for `target`, following `next` through ids
/// accepted by `live`.
///
/// Returns the path `start → … → target` if `target` is reachable.
fn find_path<'a>(
    start: WordId,
    target: WordId,
    next: impl Fn(WordId) -> &'a [WordId],
    live: &impl Fn(WordId) -> bool,
) -> Option<Vec<WordId>> {
    let mut came_from: HashMap<WordId, WordId> = HashMap::new();
    let mut visited: HashSet<WordId> = HashSet::from([start]);
    let mut queue: VecDeque<WordId> = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        for &neighbor in next(current) {
            if !live(neighbor) || !visited.insert(neighbor) {
                continue;
            }
            came_from.insert(neighbor, current);
            if neighbor == target {
                return Some(reconstruct_path(&came_from, start, target));
            }
            queue.push_back(neighbor);
        }
    }

    None
}

/// Rebuild `start → … → end` by following `came_from` back from `end`.
fn reconstruct_path(came_from: &HashMap<WordId, WordId>, start: WordId, end: WordId) -> Vec<WordId> {
    let mut chain = vec![end];
    let mut current = end;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                chain.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    chain.reverse();
    chain
}

/// Breadth-first transitive closure from `start`, excluding `start`.
fn closure<'a>(start: WordId, next: impl Fn(WordId) -> &'a [WordId]) -> Vec<WordId> {
    let mut visited: HashSet<WordId> = HashSet::from([start]);
    let mut queue: VecDeque<WordId> = VecDeque::from([start]);
    let mut out = Vec::new();

    while let Some(current) = queue.pop_front() {
        for &neighbor in next(current) {
            if visited.insert(neighbor) {
                out.push(neighbor);
                queue.push_back(neighbor);
            }
        }
    }

    out
}

/// DFS that returns `true` as soon as a back edge is found.
fn dfs_has_cycle(index: &RelationIndex, node: WordId, color: &mut HashMap<WordId, Color>) -> bool {
    color.insert(node, Color::Gray);

    for &child in index.children(node) {
        match color.get(&child).copied().unwrap_or(Color::White) {
            Color::White => {
                if dfs_has_cycle(index, child, color) {
                    return true;
                }
            }
            Color::Gray => return true,
            Color::Black => {}
        }
    }

    color.insert(node, Color::Black);
    false
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
