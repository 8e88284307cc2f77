//! Nested branch forest: value-level insert and read-only traversals.
//!
//! The forest is plain data. Operations take it by value and hand back the
//! new forest, the caller replaces its stored state with the result.

use tracing::{debug, instrument};

use crate::domain::entities::{Branch, BranchId};

/// Ordered top-level collection of root branches.
pub type Forest = Vec<Branch>;

/// Result of attaching a branch to the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Attached,
    /// No node carries the requested parent id; the forest is unchanged.
    ParentNotFound,
}

impl InsertOutcome {
    pub fn is_attached(&self) -> bool {
        matches!(self, InsertOutcome::Attached)
    }
}

/// Attach `branch` under `parent_id`, or as a new root when `parent_id` is None.
///
/// The first node matching `parent_id` in depth-first order receives the branch
/// at the end of its children. Without a match the forest comes back unchanged
/// and the branch is dropped.
#[instrument(level = "debug", skip(forest, branch), fields(branch = %branch.id))]
pub fn insert(
    mut forest: Forest,
    parent_id: Option<&BranchId>,
    branch: Branch,
) -> (Forest, InsertOutcome) {
    let Some(parent_id) = parent_id else {
        forest.push(branch);
        return (forest, InsertOutcome::Attached);
    };

    match attach_first(&mut forest, parent_id, branch) {
        Ok(()) => (forest, InsertOutcome::Attached),
        Err(dropped) => {
            debug!("parent {} not found, dropping {}", parent_id, dropped.id);
            (forest, InsertOutcome::ParentNotFound)
        }
    }
}

// Hands the branch back when no node in `nodes` (or below) matches.
fn attach_first(
    nodes: &mut [Branch],
    parent_id: &BranchId,
    mut branch: Branch,
) -> Result<(), Branch> {
    for node in nodes.iter_mut() {
        if node.id == *parent_id {
            node.children.push(branch);
            return Ok(());
        }
        match attach_first(&mut node.children, parent_id, branch) {
            Ok(()) => return Ok(()),
            Err(b) => branch = b,
        }
    }
    Err(branch)
}

/// Depth-first lookup by id.
pub fn find<'a>(forest: &'a [Branch], id: &BranchId) -> Option<&'a Branch> {
    preorder(forest).map(|(_, b)| b).find(|b| b.id == *id)
}

pub fn contains(forest: &[Branch], id: &BranchId) -> bool {
    find(forest, id).is_some()
}

/// Total number of nodes.
pub fn len(forest: &[Branch]) -> usize {
    preorder(forest).count()
}

/// Number of levels of the deepest tree, 0 for an empty forest.
pub fn depth(forest: &[Branch]) -> usize {
    forest
        .iter()
        .map(|b| 1 + depth(&b.children))
        .max()
        .unwrap_or(0)
}

pub fn preorder(forest: &[Branch]) -> Preorder<'_> {
    Preorder::new(forest)
}

/// Pre-order walk yielding `(depth, branch)`, left to right.
#[derive(Debug)]
pub struct Preorder<'a> {
    stack: Vec<(usize, &'a Branch)>,
}

impl<'a> Preorder<'a> {
    fn new(forest: &'a [Branch]) -> Self {
        let stack = forest.iter().rev().map(|b| (0, b)).collect();
        Self { stack }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a Branch);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}
