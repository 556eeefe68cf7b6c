//! Config path resolution.
//!
//! Maps a dashboard identifier and a document file name to a location under
//! the configuration root:
//! - `default` (or no id) lives directly in the root
//! - every other dashboard lives in `dashboards/<id>/`
//!
//! This is pure path arithmetic with no filesystem I/O. Identifiers must
//! already have been validated against the registry before they get here.

use crate::types::{ConfigKind, DEFAULT_DASHBOARD_ID};
use std::path::{Path, PathBuf};

/// File name of the dashboard manifest.
pub const MANIFEST_FILE: &str = "dashboards.yaml";

/// Directory under the root holding per-dashboard document sets.
pub const DASHBOARDS_DIR: &str = "dashboards";

/// Filesystem layout of a configuration root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayout {
    root: PathBuf,
}

impl ConfigLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the configuration root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the manifest listing registered dashboards.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Directory containing all non-default dashboards.
    pub fn dashboards_dir(&self) -> PathBuf {
        self.root.join(DASHBOARDS_DIR)
    }

    /// Storage directory for a dashboard.
    pub fn dashboard_dir(&self, dashboard_id: Option<&str>) -> PathBuf {
        match dashboard_id {
            None => self.root.clone(),
            Some(id) if id.is_empty() || id == DEFAULT_DASHBOARD_ID => self.root.clone(),
            Some(id) => self.dashboards_dir().join(id),
        }
    }

    /// Resolve a file name for a dashboard.
    pub fn resolve(&self, dashboard_id: Option<&str>, filename: &str) -> PathBuf {
        self.dashboard_dir(dashboard_id).join(filename)
    }

    /// Resolve the document of the given kind for a dashboard.
    pub fn document_path(&self, dashboard_id: Option<&str>, kind: ConfigKind) -> PathBuf {
        self.resolve(dashboard_id, kind.file_name())
    }
}
