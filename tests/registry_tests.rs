//! Integration tests for the dashboard registry.
//!
//! Each test works on its own temporary configuration root.

use dashboard_config::error::ErrorCode;
use dashboard_config::paths::ConfigLayout;
use dashboard_config::skeleton::Skeleton;
use dashboard_config::store::ConfigStore;
use dashboard_config::substitution::EnvSubstitution;
use dashboard_config::types::ConfigKind;
use tempfile::TempDir;

/// Helper to create a store over a fresh temporary root.
fn setup_store() -> (TempDir, ConfigStore) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = ConfigStore::open(temp.path());
    (temp, store)
}

mod list_tests {
    use super::*;

    #[test]
    fn fresh_root_lists_only_default() {
        let (temp, store) = setup_store();

        let dashboards = store.list_dashboards();

        assert_eq!(dashboards.len(), 1);
        assert_eq!(dashboards[0].id, "default");
        assert_eq!(dashboards[0].name, "Default Dashboard");
        assert!(dashboards[0].is_default);
        assert!(temp.path().join("dashboards.yaml").exists());
    }

    #[test]
    fn manifest_uses_camel_case_keys() {
        let (temp, store) = setup_store();
        store
            .create_dashboard("work", "Work Dashboard", Some("Office links"))
            .expect("create failed");

        let manifest = std::fs::read_to_string(temp.path().join("dashboards.yaml")).unwrap();
        assert!(manifest.contains("isDefault: true"));
        assert!(manifest.contains("createdAt:"));
        assert!(manifest.contains("description: Office links"));
    }

    #[test]
    fn default_is_listed_even_when_missing_from_manifest() {
        let (temp, store) = setup_store();
        std::fs::write(
            temp.path().join("dashboards.yaml"),
            "dashboards:\n  - id: media\n    name: Media\n",
        )
        .unwrap();

        let ids: Vec<String> = store.list_dashboards().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["default", "media"]);
    }

    #[test]
    fn malformed_manifest_falls_back_to_default() {
        let (temp, store) = setup_store();
        std::fs::write(temp.path().join("dashboards.yaml"), "dashboards: [unclosed").unwrap();

        let dashboards = store.list_dashboards();
        assert_eq!(dashboards.len(), 1);
        assert!(dashboards[0].is_default);
    }
}

mod create_tests {
    use super::*;

    #[test]
    fn create_registers_and_copies_skeleton() {
        let (temp, store) = setup_store();

        let dashboard = store
            .create_dashboard("work", "Work Dashboard", None)
            .expect("create failed");

        assert_eq!(dashboard.id, "work");
        assert!(!dashboard.is_default);
        assert!(dashboard.created_at.is_some());

        let ids: Vec<String> = store.list_dashboards().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["default", "work"]);

        let dir = temp.path().join("dashboards").join("work");
        for kind in ConfigKind::ALL {
            assert!(dir.join(kind.file_name()).exists(), "{} not copied", kind);
        }
    }

    #[test]
    fn duplicate_id_rejected() {
        let (_temp, store) = setup_store();
        store.create_dashboard("work", "Work", None).unwrap();

        let err = store.create_dashboard("work", "Other", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(store.list_dashboards().len(), 2);
    }

    #[test]
    fn default_id_rejected() {
        let (_temp, store) = setup_store();
        let err = store.create_dashboard("default", "Again", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
    }

    #[test]
    fn empty_id_or_name_rejected() {
        let (temp, store) = setup_store();

        let err = store.create_dashboard("", "Name", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert_eq!(err.message, "Dashboard ID and name are required");

        let err = store.create_dashboard("work", "", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);

        assert!(!temp.path().join("dashboards").join("work").exists());
    }

    #[test]
    fn unsafe_id_rejected_before_touching_disk() {
        let (temp, store) = setup_store();

        for id in ["../escape", "Work", "a/b", "with space"] {
            let err = store.create_dashboard(id, "Bad", None).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidArgument, "id {:?}", id);
        }
        assert!(!temp.path().join("dashboards").exists());
        assert!(!temp.path().join("escape").exists());
    }

    #[test]
    fn partial_skeleton_skips_missing_templates() {
        let temp = TempDir::new().unwrap();
        let skeleton = TempDir::new().unwrap();
        std::fs::write(skeleton.path().join("services.yaml"), "- Group: []\n").unwrap();

        let store = ConfigStore::with_parts(
            ConfigLayout::new(temp.path()),
            Skeleton::Directory(skeleton.path().to_path_buf()),
            EnvSubstitution::with_vars(Vec::<(String, String)>::new()),
        );
        store.create_dashboard("lab", "Lab", None).expect("create failed");

        let dir = temp.path().join("dashboards").join("lab");
        assert!(dir.join("services.yaml").exists());
        assert!(!dir.join("bookmarks.yaml").exists());
        assert!(!dir.join("settings.yaml").exists());
        assert!(store.dashboard_exists("lab"));
    }

    #[test]
    fn concurrent_creates_all_registered() {
        let (_temp, store) = setup_store();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .create_dashboard(&format!("board-{}", i), "Board", None)
                        .expect("create failed")
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let dashboards = store.list_dashboards();
        assert_eq!(dashboards.len(), 9);
        for i in 0..8 {
            assert!(store.dashboard_exists(&format!("board-{}", i)));
        }
    }
}

mod delete_tests {
    use super::*;

    #[test]
    fn delete_removes_directory_and_entry() {
        let (temp, store) = setup_store();
        store.create_dashboard("work", "Work", None).unwrap();

        store.delete_dashboard("work").expect("delete failed");

        assert!(!temp.path().join("dashboards").join("work").exists());
        assert!(!store.dashboard_exists("work"));
        assert_eq!(store.list_dashboards().len(), 1);
    }

    #[test]
    fn delete_default_forbidden() {
        let (temp, store) = setup_store();
        std::fs::write(temp.path().join("settings.yaml"), "title: Home\n").unwrap();

        let err = store.delete_dashboard("default").unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(temp.path().join("settings.yaml").exists());
    }

    #[test]
    fn delete_unknown_not_found() {
        let (_temp, store) = setup_store();
        let err = store.delete_dashboard("ghost").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn delete_traversal_id_not_found() {
        let (temp, store) = setup_store();
        std::fs::create_dir_all(temp.path().join("keep")).unwrap();

        let err = store.delete_dashboard("../keep").unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(temp.path().join("keep").exists());
    }

    #[test]
    fn delete_empty_id_rejected() {
        let (_temp, store) = setup_store();
        let err = store.delete_dashboard("").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }

    #[test]
    fn delete_keeps_other_dashboards() {
        let (_temp, store) = setup_store();
        store.create_dashboard("work", "Work", None).unwrap();
        store.create_dashboard("home", "Home", None).unwrap();

        store.delete_dashboard("work").unwrap();

        let ids: Vec<String> = store.list_dashboards().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["default", "home"]);
    }
}
