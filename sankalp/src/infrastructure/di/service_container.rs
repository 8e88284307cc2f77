//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::{OrganizationService, OrganizationStore};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, IdGenerator, RealFileSystem, TimestampIdGenerator};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Id source for new branches and roles
    pub ids: Arc<dyn IdGenerator>,

    pub organization: OrganizationService,
    pub store: OrganizationStore,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(TimestampIdGenerator::new()),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let settings = Arc::new(settings);
        let organization = OrganizationService::new(Arc::clone(&ids));
        let store = OrganizationStore::new(Arc::clone(&fs));

        Self {
            settings,
            fs,
            ids,
            organization,
            store,
        }
    }

    /// Path of the organization data file in use.
    pub fn data_file(&self) -> &Path {
        &self.settings.data_file
    }
}
