//! Service container for dependency injection
//!
//! Wires settings and the filesystem into sessions and exports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::{export_to_path, ApplicationResult, IoResultExt, Session};
use crate::config::Settings;
use crate::domain::GenealogyTree;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O boundaries.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// Fresh session whose trees follow the configured policies.
    pub fn session(&self) -> ApplicationResult<Session> {
        Session::new(self.settings.tree_options())
    }

    pub fn read_script(&self, path: &Path) -> ApplicationResult<String> {
        self.fs
            .read_to_string(path)
            .with_path_context("read script", path)
    }

    /// Writes `tree` as CSV; returns the resolved target and the row count.
    pub fn export(&self, tree: &GenealogyTree, target: &Path) -> ApplicationResult<(PathBuf, usize)> {
        let path = self.settings.resolve_export_path(target);
        let rows = export_to_path(self.fs.as_ref(), tree, &path, self.settings.export.header)?;
        Ok((path, rows))
    }
}
