//! Result adapters that attach a file path to lower-level errors.

use std::fmt::Display;
use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// `io::Result` → `ApplicationResult`, naming the action and the file.
///
/// ```ignore
/// fs.read_to_string(path)
///     .with_path_context("read organization file", path)?;
/// ```
pub trait IoResultExt<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// (De)serialization failures of the organization file become `InvalidDocument`.
pub trait DocumentResultExt<T> {
    fn in_document(self, path: &Path) -> ApplicationResult<T>;
}

impl<T, E: Display> DocumentResultExt<T> for Result<T, E> {
    fn in_document(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::InvalidDocument {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
