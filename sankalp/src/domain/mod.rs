//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod expansion;
pub mod forest;
pub mod projects;
pub mod render;
pub mod roles;

pub use arena::{BranchArena, BranchRecord};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use expansion::ExpandedSet;
pub use forest::{Forest, InsertOutcome};
pub use projects::{
    Activity, ActivityKind, BranchFilter, Project, ProjectTask, TaskGraph, TaskStatus,
};
pub use render::{render, render_forest, BranchView, Toggle, TreeNodeConvert};
pub use roles::RoleBook;
