//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations and id generation, allowing
//! services to be tested with deterministic implementations.

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Source of ids for newly created branches and roles.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

// Shared by all generators so ids stay unique within one process.
static LAST_TIMESTAMP_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamps, strictly increasing across calls.
#[derive(Debug, Default)]
pub struct TimestampIdGenerator;

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = LAST_TIMESTAMP_ID.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match LAST_TIMESTAMP_ID.compare_exchange_weak(
                prev,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Counter starting at a fixed value. Deterministic ids for tests and scripts.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}
