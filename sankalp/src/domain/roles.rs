//! Custom roles attached to branches by a flat branch id.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Branch, BranchId, CustomRole};
use crate::domain::forest;

/// Ordered list of custom roles. Create-and-list only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleBook(Vec<CustomRole>);

impl RoleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, role: CustomRole) {
        self.0.push(role);
    }

    pub fn list(&self) -> &[CustomRole] {
        &self.0
    }

    pub fn get(&self, id: &str) -> Option<&CustomRole> {
        self.0.iter().find(|r| r.id == id)
    }

    pub fn for_branch<'a>(
        &'a self,
        branch_id: &'a BranchId,
    ) -> impl Iterator<Item = &'a CustomRole> {
        self.0.iter().filter(move |r| r.branch_id == *branch_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name of the branch a role belongs to, looked up anywhere in the forest.
    pub fn branch_name<'a>(forest: &'a [Branch], role: &CustomRole) -> Option<&'a str> {
        forest::find(forest, &role.branch_id).map(|b| b.name.as_str())
    }
}

impl From<Vec<CustomRole>> for RoleBook {
    fn from(roles: Vec<CustomRole>) -> Self {
        Self(roles)
    }
}
