//! Expand/collapse view state for the hierarchy.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Branch, BranchId};
use crate::domain::forest;

/// Ids of branches whose children are currently shown.
///
/// Empty by default: only the roots of the forest are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandedSet(BTreeSet<BranchId>);

impl ExpandedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse `id` if expanded, expand it otherwise. Returns the new state.
    pub fn toggle(&mut self, id: &BranchId) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.clone());
            true
        }
    }

    /// Value-returning variant of [`ExpandedSet::toggle`].
    pub fn toggled(mut self, id: &BranchId) -> Self {
        self.toggle(id);
        self
    }

    pub fn expand(&mut self, id: BranchId) {
        self.0.insert(id);
    }

    pub fn is_expanded(&self, id: &BranchId) -> bool {
        self.0.contains(id)
    }

    /// Expand every branch that has children.
    pub fn expand_all(&mut self, forest: &[Branch]) {
        for (_, branch) in forest::preorder(forest) {
            if branch.has_children() {
                self.0.insert(branch.id.clone());
            }
        }
    }

    pub fn collapse_all(&mut self) {
        self.0.clear();
    }

    /// Drop ids that no longer name a branch of `forest`.
    pub fn retain_known(&mut self, forest: &[Branch]) {
        self.0.retain(|id| forest::contains(forest, id));
    }

    pub fn iter(&self) -> impl Iterator<Item = &BranchId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<BranchId> for ExpandedSet {
    fn from_iter<I: IntoIterator<Item = BranchId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
