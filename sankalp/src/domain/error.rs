//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::BranchId;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("parent branch not found: {0}")]
    ParentNotFound(BranchId),

    #[error("branch not found: {0}")]
    BranchNotFound(BranchId),

    #[error("duplicate branch id: {0}")]
    DuplicateBranchId(BranchId),

    #[error("cycle detected in hierarchy: {0} would become its own ancestor")]
    CycleDetected(BranchId),

    #[error("required field is empty: {0}")]
    MissingField(&'static str),

    #[error("unknown branch kind: {0} (expected branch, division or unit)")]
    UnknownBranchKind(String),

    #[error("unknown permission: {0}")]
    UnknownPermission(String),

    #[error("task {task} depends on unknown task {dependency}")]
    UnknownTaskDependency { task: String, dependency: String },

    #[error("cycle detected in task dependencies: {0}")]
    TaskCycle(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
