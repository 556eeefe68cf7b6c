//! Dashboard registry backed by the `dashboards.yaml` manifest.

use super::ConfigStore;
use super::fs::{remove_dir_all_tolerant, write_atomic};
use crate::error::{ConfigError, ConfigResult, ErrorCode};
use crate::types::{ConfigKind, Dashboard, Manifest};
use chrono::Utc;
use std::sync::MutexGuard;
use tracing::{debug, info, warn};

/// Allowed dashboard identifiers.
const DASHBOARD_ID_PATTERN: &str = r"^[a-z0-9_-]+$";

/// Check an identifier against the dashboard id character class.
pub fn is_valid_dashboard_id(id: &str) -> bool {
    regex_lite::Regex::new(DASHBOARD_ID_PATTERN)
        .map(|re| re.is_match(id))
        .unwrap_or(false)
}

/// Make sure the default dashboard is present (first) and is the only one
/// flagged as default.
fn with_default(mut dashboards: Vec<Dashboard>) -> Vec<Dashboard> {
    for dashboard in dashboards.iter_mut() {
        dashboard.is_default = Dashboard::is_default_id(&dashboard.id);
    }
    if !dashboards.iter().any(|d| d.is_default) {
        dashboards.insert(0, Dashboard::default_dashboard());
    }
    dashboards
}

impl ConfigStore {
    fn lock_registry(&self) -> MutexGuard<'_, ()> {
        self.registry_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read and parse the manifest. `Ok(None)` when the file is absent.
    fn load_manifest(&self) -> ConfigResult<Option<Manifest>> {
        let path = self.layout().manifest_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::storage("Failed to read dashboards.yaml", e)),
        };
        let manifest: Manifest = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::storage("Failed to parse dashboards.yaml", e))?;
        Ok(Some(manifest))
    }

    /// Manifest contents for a read-modify-write cycle. A malformed manifest
    /// is an error here so that it is never silently overwritten.
    fn load_for_update(&self) -> ConfigResult<Vec<Dashboard>> {
        Ok(match self.load_manifest()? {
            Some(manifest) => with_default(manifest.dashboards),
            None => vec![Dashboard::default_dashboard()],
        })
    }

    fn save_manifest(&self, dashboards: &[Dashboard]) -> ConfigResult<()> {
        let manifest = Manifest {
            dashboards: dashboards.to_vec(),
        };
        let yaml = serde_yaml::to_string(&manifest)
            .map_err(|e| ConfigError::storage("Failed to serialize dashboards.yaml", e))?;
        write_atomic(&self.layout().manifest_path(), &yaml)
            .map_err(|e| ConfigError::storage("Failed to write dashboards.yaml", e))
    }

    /// List registered dashboards in manifest order.
    ///
    /// A missing manifest is initialized with the default dashboard. An
    /// unreadable or malformed manifest yields only the default dashboard.
    pub fn list_dashboards(&self) -> Vec<Dashboard> {
        match self.load_manifest() {
            Ok(Some(manifest)) => with_default(manifest.dashboards),
            Ok(None) => {
                let dashboards = vec![Dashboard::default_dashboard()];
                let _guard = self.lock_registry();
                // Another writer may have created it since we looked.
                if !self.layout().manifest_path().exists() {
                    match self.save_manifest(&dashboards) {
                        Ok(()) => debug!("Initialized dashboards.yaml"),
                        Err(e) => warn!(error = %e, "Could not initialize dashboards.yaml"),
                    }
                }
                dashboards
            }
            Err(e) => {
                warn!(error = %e, "Failed to load dashboards.yaml, using default dashboard only");
                vec![Dashboard::default_dashboard()]
            }
        }
    }

    /// Check whether a dashboard is registered.
    pub fn dashboard_exists(&self, id: &str) -> bool {
        if Dashboard::is_default_id(id) {
            return true;
        }
        self.list_dashboards().iter().any(|d| d.id == id)
    }

    /// Validate an identifier received from outside before it is used to
    /// build a path. Only registered ids and `default` pass.
    pub fn validate_dashboard_id(&self, id: &str) -> bool {
        !id.is_empty() && self.dashboard_exists(id)
    }

    /// Like `validate_dashboard_id`, as an error.
    pub fn require_dashboard(&self, id: &str) -> ConfigResult<()> {
        if self.validate_dashboard_id(id) {
            Ok(())
        } else {
            Err(ConfigError::invalid_dashboard(id))
        }
    }

    /// Register a new dashboard and populate its documents from the skeleton.
    ///
    /// The manifest is written last, so a dashboard only becomes visible once
    /// everything else has succeeded.
    pub fn create_dashboard(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
    ) -> ConfigResult<Dashboard> {
        self.create_dashboard_with(id, name, description, Self::save_manifest)
    }

    /// `create_dashboard` with the manifest commit step supplied by the caller.
    fn create_dashboard_with(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
        commit: impl FnOnce(&Self, &[Dashboard]) -> ConfigResult<()>,
    ) -> ConfigResult<Dashboard> {
        if id.is_empty() || name.is_empty() {
            let field = if id.is_empty() { "id" } else { "name" };
            return Err(ConfigError::new(
                ErrorCode::InvalidArgument,
                "Dashboard ID and name are required",
            )
            .with_field(field));
        }
        if !is_valid_dashboard_id(id) {
            return Err(ConfigError::invalid_value(
                "id",
                "Dashboard ID may only contain lowercase letters, digits, '-' and '_'",
            ));
        }

        let _guard = self.lock_registry();
        let mut dashboards = self.load_for_update()?;
        if Dashboard::is_default_id(id) || dashboards.iter().any(|d| d.id == id) {
            return Err(ConfigError::dashboard_exists(id));
        }

        let dir = self.layout().dashboard_dir(Some(id));
        std::fs::create_dir_all(&dir)
            .map_err(|e| ConfigError::storage("Failed to create dashboard", e))?;

        for kind in ConfigKind::ALL {
            let dest = dir.join(kind.file_name());
            // Leftovers from an earlier, unregistered attempt are kept.
            if dest.exists() {
                continue;
            }
            match self.skeleton().template(kind)? {
                Some(template) => write_atomic(&dest, &template)
                    .map_err(|e| ConfigError::storage("Failed to create dashboard", e))?,
                None => debug!(dashboard = %id, kind = %kind, "Skeleton template missing, skipped"),
            }
        }

        let dashboard = Dashboard {
            id: id.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            is_default: false,
            created_at: Some(Utc::now()),
        };
        dashboards.push(dashboard.clone());
        commit(self, &dashboards)?;

        info!(dashboard = %id, name = %name, "Created dashboard");
        Ok(dashboard)
    }

    /// Remove a dashboard's storage directory and unregister it.
    pub fn delete_dashboard(&self, id: &str) -> ConfigResult<()> {
        if Dashboard::is_default_id(id) {
            return Err(ConfigError::default_protected());
        }
        if id.is_empty() {
            return Err(ConfigError::missing_field("id"));
        }
        // Anything outside the id character class cannot name a directory
        // we created, and must never reach a path.
        if !is_valid_dashboard_id(id) {
            return Err(ConfigError::dashboard_not_found(id));
        }

        let _guard = self.lock_registry();
        let dir = self.layout().dashboard_dir(Some(id));
        if !dir.is_dir() {
            return Err(ConfigError::dashboard_not_found(id));
        }

        let dashboards = self.load_for_update()?;

        remove_dir_all_tolerant(&dir)
            .map_err(|e| ConfigError::storage("Failed to delete dashboard", e))?;

        let remaining: Vec<Dashboard> = dashboards.into_iter().filter(|d| d.id != id).collect();
        self.save_manifest(&remaining)?;

        info!(dashboard = %id, "Deleted dashboard");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dashboard_id_pattern() {
        assert!(is_valid_dashboard_id("work"));
        assert!(is_valid_dashboard_id("home-lab_2"));
        assert!(!is_valid_dashboard_id(""));
        assert!(!is_valid_dashboard_id("Work"));
        assert!(!is_valid_dashboard_id("../etc"));
        assert!(!is_valid_dashboard_id("a b"));
    }

    #[test]
    fn test_with_default_prepends_and_flags() {
        let other = Dashboard {
            id: "work".into(),
            name: "Work".into(),
            description: None,
            is_default: true,
            created_at: None,
        };
        let list = with_default(vec![other]);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "default");
        assert!(list[0].is_default);
        assert!(!list[1].is_default);
    }

    #[test]
    fn test_malformed_manifest_blocks_create() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("dashboards.yaml"), "dashboards: [oops").unwrap();
        let store = ConfigStore::open(temp.path());

        assert_eq!(store.list_dashboards().len(), 1);
        let err = store.create_dashboard("work", "Work", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
        // Manifest untouched
        assert_eq!(
            std::fs::read_to_string(temp.path().join("dashboards.yaml")).unwrap(),
            "dashboards: [oops"
        );
    }

    #[test]
    fn test_failed_manifest_write_hides_dashboard() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::open(temp.path());

        let err = store
            .create_dashboard_with("work", "Work", None, |_, _| {
                Err(ConfigError::storage(
                    "Failed to write dashboards.yaml",
                    "disk full",
                ))
            })
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(store.list_dashboards().iter().all(|d| d.id != "work"));
        assert!(!store.dashboard_exists("work"));
        assert!(store.require_dashboard("work").is_err());
    }
}
