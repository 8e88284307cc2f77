//! Flat arena index over the branch forest.
//!
//! Gives O(1) id lookup and parent back-references, so ancestor chains can be
//! walked without recursion. Attach checks reject self-ancestry and id reuse.

use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::entities::{Branch, BranchId, BranchKind};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::forest::{self, Forest};

/// Branch payload stored in the arena, without the owned children.
#[derive(Debug, Clone)]
pub struct BranchRecord {
    pub id: BranchId,
    pub name: String,
    pub kind: BranchKind,
    pub location: String,
    pub head: String,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

impl BranchRecord {
    fn from_branch(branch: &Branch, parent: Option<Index>) -> Self {
        Self {
            id: branch.id.clone(),
            name: branch.name.clone(),
            kind: branch.kind,
            location: branch.location.clone(),
            head: branch.head.clone(),
            parent,
            children: Vec::new(),
        }
    }
}

impl fmt::Display for BranchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Flat arena view of a branch forest.
///
/// Uses generational arena for memory-safe node references plus an id index,
/// so lookups by id are O(1) and parent chains can be walked without recursion.
#[derive(Debug, Clone, Default)]
pub struct BranchArena {
    arena: Arena<BranchRecord>,
    index: HashMap<BranchId, Index>,
    roots: Vec<Index>,
}

impl BranchArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index an existing forest. Fails on the first repeated id.
    #[instrument(level = "debug", skip(forest))]
    pub fn from_forest(forest: &[Branch]) -> DomainResult<Self> {
        let mut arena = Self::new();
        let mut stack: Vec<(&Branch, Option<Index>)> =
            forest.iter().rev().map(|b| (b, None)).collect();

        while let Some((branch, parent)) = stack.pop() {
            if arena.index.contains_key(&branch.id) {
                return Err(DomainError::DuplicateBranchId(branch.id.clone()));
            }
            let idx = arena.insert_record(BranchRecord::from_branch(branch, parent));
            for child in branch.children.iter().rev() {
                stack.push((child, Some(idx)));
            }
        }

        debug!("indexed {} branches", arena.len());
        Ok(arena)
    }

    fn insert_record(&mut self, record: BranchRecord) -> Index {
        let id = record.id.clone();
        let parent = record.parent;
        let idx = self.arena.insert(record);
        self.index.insert(id, idx);

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.push(idx),
            None => self.roots.push(idx),
        }
        idx
    }

    /// Check that a node with `id` may be attached under `parent_id`.
    ///
    /// Rejects a parent whose ancestor chain contains `id`, an id that is already
    /// taken, and a parent that does not exist.
    #[instrument(level = "trace", skip(self))]
    pub fn check_attach(&self, id: &BranchId, parent_id: Option<&BranchId>) -> DomainResult<()> {
        if let Some(parent_id) = parent_id {
            let parent_idx = self
                .index
                .get(parent_id)
                .copied()
                .ok_or_else(|| DomainError::ParentNotFound(parent_id.clone()))?;
            if self.chain(parent_idx).any(|rec| rec.id == *id) {
                return Err(DomainError::CycleDetected(id.clone()));
            }
        }
        if self.index.contains_key(id) {
            return Err(DomainError::DuplicateBranchId(id.clone()));
        }
        Ok(())
    }

    /// Attach `branch` (and any subtree it carries) under `parent_id`.
    #[instrument(level = "debug", skip(self, branch), fields(branch = %branch.id))]
    pub fn attach(&mut self, branch: &Branch, parent_id: Option<&BranchId>) -> DomainResult<()> {
        self.check_attach(&branch.id, parent_id)?;

        let mut seen = std::collections::HashSet::new();
        for (_, node) in forest::preorder(std::slice::from_ref(branch)) {
            if self.index.contains_key(&node.id) || !seen.insert(&node.id) {
                return Err(DomainError::DuplicateBranchId(node.id.clone()));
            }
        }

        let parent = parent_id.and_then(|p| self.index.get(p).copied());
        let mut stack = vec![(branch, parent)];
        while let Some((node, parent)) = stack.pop() {
            let idx = self.insert_record(BranchRecord::from_branch(node, parent));
            for child in node.children.iter().rev() {
                stack.push((child, Some(idx)));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &BranchId) -> Option<&BranchRecord> {
        self.index.get(id).and_then(|&idx| self.arena.get(idx))
    }

    pub fn contains(&self, id: &BranchId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    // Walks from `start` up to its root, `start` included.
    fn chain(&self, start: Index) -> impl Iterator<Item = &BranchRecord> + '_ {
        std::iter::successors(self.arena.get(start), move |rec| {
            rec.parent.and_then(|p| self.arena.get(p))
        })
    }

    /// Ids from the node's parent up to its root.
    pub fn ancestors(&self, id: &BranchId) -> DomainResult<Vec<BranchId>> {
        let idx = self
            .index
            .get(id)
            .copied()
            .ok_or_else(|| DomainError::BranchNotFound(id.clone()))?;
        Ok(self.chain(idx).skip(1).map(|rec| rec.id.clone()).collect())
    }

    /// Branch names from the root down to the node.
    pub fn path(&self, id: &BranchId) -> DomainResult<Vec<String>> {
        let idx = self
            .index
            .get(id)
            .copied()
            .ok_or_else(|| DomainError::BranchNotFound(id.clone()))?;
        let mut names: Vec<String> = self.chain(idx).map(|rec| rec.name.clone()).collect();
        names.reverse();
        Ok(names)
    }

    /// Rebuild the nested forest. Parent ids are taken from the arena structure.
    pub fn to_forest(&self) -> Forest {
        self.roots
            .iter()
            .filter_map(|&idx| self.build_branch(idx))
            .collect()
    }

    fn build_branch(&self, idx: Index) -> Option<Branch> {
        let rec = self.arena.get(idx)?;
        Some(Branch {
            id: rec.id.clone(),
            name: rec.name.clone(),
            kind: rec.kind,
            location: rec.location.clone(),
            head: rec.head.clone(),
            parent_id: rec
                .parent
                .and_then(|p| self.arena.get(p))
                .map(|p| p.id.clone()),
            children: rec
                .children
                .iter()
                .filter_map(|&child| self.build_branch(child))
                .collect(),
        })
    }
}
