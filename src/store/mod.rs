//! Configuration store for the dashboard manager.
//!
//! `ConfigStore` owns a configuration root and exposes:
//! - the dashboard registry (`dashboards.rs`)
//! - document read/write and bootstrap (`documents.rs`)
//! - structured settings loading (`settings.rs`)

pub mod dashboards;
pub mod documents;
mod fs;
pub mod settings;

pub use documents::{Bootstrap, DocumentCheck, DocumentStatus, read_raw, validate_yaml};
pub use settings::normalize_layout;

use crate::paths::ConfigLayout;
use crate::skeleton::Skeleton;
use crate::substitution::EnvSubstitution;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Handle to a configuration root on disk.
///
/// Cheap to clone; clones share the registry writer lock and the
/// substitution snapshot.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    layout: ConfigLayout,
    skeleton: Skeleton,
    env: Arc<EnvSubstitution>,
    /// Serializes manifest read-modify-write cycles.
    registry_lock: Arc<Mutex<()>>,
}

impl ConfigStore {
    /// Open a store rooted at `root`, using embedded skeleton templates and
    /// the process environment for substitution.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::with_parts(
            ConfigLayout::new(root),
            Skeleton::Embedded,
            EnvSubstitution::from_process_env(),
        )
    }

    pub fn with_parts(layout: ConfigLayout, skeleton: Skeleton, env: EnvSubstitution) -> Self {
        Self {
            layout,
            skeleton,
            env: Arc::new(env),
            registry_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn layout(&self) -> &ConfigLayout {
        &self.layout
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn env(&self) -> &EnvSubstitution {
        &self.env
    }
}
