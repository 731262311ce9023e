//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{PhylogenyService, RecordService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Specimen record loading
    pub records: RecordService,

    /// Tree pipeline, owning the trunk for this invocation
    pub phylogeny: PhylogenyService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> ApplicationResult<Self> {
        let phylogeny = PhylogenyService::from_settings(&settings)?;
        let records = RecordService::new(Arc::clone(&fs));
        let settings = Arc::new(settings);

        Ok(Self {
            settings,
            fs,
            records,
            phylogeny,
        })
    }
}
