//! Application services

pub mod organization;
pub mod store;

pub use organization::{OrganizationService, OrganizationSession};
pub use store::OrganizationStore;
