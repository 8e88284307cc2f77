//! Session persistence as a TOML document.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::services::organization::OrganizationSession;
use crate::application::{ApplicationResult, DocumentResultExt, IoResultExt};
use crate::domain::BranchArena;
use crate::infrastructure::traits::FileSystem;

/// Loads and saves organization sessions.
pub struct OrganizationStore {
    fs: Arc<dyn FileSystem>,
}

impl OrganizationStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load the session stored at `path`.
    ///
    /// A missing file yields the sample organization. The loaded forest must
    /// have unique ids. Parent ids are rewritten to match the nesting, and
    /// expanded ids that no longer exist are dropped.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<OrganizationSession> {
        if !self.fs.exists(path) {
            info!("no organization file at {}, using sample data", path.display());
            return Ok(OrganizationSession::sample());
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read organization file", path)?;
        let mut session = Self::parse(&content, path)?;

        let normalized = BranchArena::from_forest(&session.branches)?.to_forest();
        if normalized != session.branches {
            warn!(
                "parent ids in {} disagree with the nesting, using the nesting",
                path.display()
            );
            session.branches = normalized;
        }

        let before = session.expanded.len();
        session.expanded.retain_known(&session.branches);
        if session.expanded.len() != before {
            debug!("dropped {} stale expanded ids", before - session.expanded.len());
        }
        Ok(session)
    }

    pub fn parse(content: &str, path: &Path) -> ApplicationResult<OrganizationSession> {
        toml::from_str(content).in_document(path)
    }

    pub fn render(session: &OrganizationSession, path: &Path) -> ApplicationResult<String> {
        toml::to_string_pretty(session).in_document(path)
    }

    #[instrument(level = "debug", skip(self, session))]
    pub fn save(&self, path: &Path, session: &OrganizationSession) -> ApplicationResult<()> {
        let content = Self::render(session, path)?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        self.fs
            .write(path, &content)
            .with_path_context("write organization file", path)?;
        debug!("saved {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }
}
