//! sankalp: organization hierarchy manager.
//!
//! Branch trees with expand/collapse rendering, custom roles with permission
//! sets, and cross-branch projects with task dependencies.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
