//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Identifier of a branch node.
///
/// Generated at creation time by an id generator (millisecond timestamp by default).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(String);

impl BranchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BranchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BranchId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Classification of a branch. No behavioral difference between kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    #[default]
    Branch,
    Division,
    Unit,
}

impl BranchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchKind::Branch => "branch",
            BranchKind::Division => "division",
            BranchKind::Unit => "unit",
        }
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BranchKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "branch" => Ok(BranchKind::Branch),
            "division" => Ok(BranchKind::Division),
            "unit" => Ok(BranchKind::Unit),
            other => Err(DomainError::UnknownBranchKind(other.to_string())),
        }
    }
}

/// Organizational unit in the hierarchy.
///
/// Children are owned exclusively by their parent and kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub kind: BranchKind,
    pub location: String,
    /// Name of the person heading the branch (not a validated reference)
    pub head: String,
    /// Parent branch, None for root nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<BranchId>,
    #[serde(default)]
    pub children: Vec<Branch>,
}

impl Branch {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Form payload for creating a branch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BranchInput {
    pub name: String,
    pub kind: BranchKind,
    pub location: String,
    pub head: String,
    pub parent_id: Option<BranchId>,
}

impl BranchInput {
    /// Reject blank required fields.
    pub fn validate(&self) -> DomainResult<()> {
        require("name", &self.name)?;
        require("location", &self.location)?;
        require("head", &self.head)?;
        Ok(())
    }

    /// Materialize the input as a childless branch with the given id.
    pub fn into_branch(self, id: BranchId) -> Branch {
        Branch {
            id,
            name: self.name.trim().to_string(),
            kind: self.kind,
            location: self.location.trim().to_string(),
            head: self.head.trim().to_string(),
            parent_id: self.parent_id,
            children: Vec::new(),
        }
    }
}

fn require(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        Err(DomainError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Permission that can be granted to a custom role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageMembers,
    ApproveEvents,
    ManageBudget,
    ManageVolunteers,
    CreateEvents,
    EditContent,
    ViewAnalytics,
    ManageCollaborations,
}

impl Permission {
    pub const ALL: [Permission; 8] = [
        Permission::ManageMembers,
        Permission::ApproveEvents,
        Permission::ManageBudget,
        Permission::ManageVolunteers,
        Permission::CreateEvents,
        Permission::EditContent,
        Permission::ViewAnalytics,
        Permission::ManageCollaborations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageMembers => "manage_members",
            Permission::ApproveEvents => "approve_events",
            Permission::ManageBudget => "manage_budget",
            Permission::ManageVolunteers => "manage_volunteers",
            Permission::CreateEvents => "create_events",
            Permission::EditContent => "edit_content",
            Permission::ViewAnalytics => "view_analytics",
            Permission::ManageCollaborations => "manage_collaborations",
        }
    }

    /// Human readable label: `manage_members` → `Manage Members`.
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| DomainError::UnknownPermission(wanted.to_string()))
    }
}

/// Flip membership of `permission`: remove it if granted, append it otherwise.
pub fn toggle_permission(permissions: &mut Vec<Permission>, permission: Permission) {
    if let Some(pos) = permissions.iter().position(|p| *p == permission) {
        permissions.remove(pos);
    } else {
        permissions.push(permission);
    }
}

/// Named permission set scoped to one branch via a flat foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRole {
    pub id: String,
    pub name: String,
    pub permissions: Vec<Permission>,
    pub branch_id: BranchId,
}

/// Form payload for creating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInput {
    pub name: String,
    pub branch_id: Option<BranchId>,
    pub permissions: Vec<Permission>,
}

impl RoleInput {
    pub fn validate(&self) -> DomainResult<()> {
        require("name", &self.name)?;
        match &self.branch_id {
            Some(id) if !id.as_str().trim().is_empty() => Ok(()),
            _ => Err(DomainError::MissingField("branch")),
        }
    }

    /// Materialize the role. Duplicate permissions collapse to their first occurrence.
    pub fn into_role(self, id: String) -> DomainResult<CustomRole> {
        self.validate()?;
        let mut permissions = Vec::with_capacity(self.permissions.len());
        for p in self.permissions {
            if !permissions.contains(&p) {
                permissions.push(p);
            }
        }
        let branch_id = self.branch_id.ok_or(DomainError::MissingField("branch"))?;
        Ok(CustomRole {
            id,
            name: self.name.trim().to_string(),
            permissions,
            branch_id,
        })
    }
}
