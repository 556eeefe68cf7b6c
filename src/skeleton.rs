//! Bundled template documents.
//!
//! Two template sets exist:
//! - The skeleton, copied into place to bootstrap missing documents. It comes
//!   from a configured directory on disk, or from embedded defaults
//!   (compiled into the binary from `skeleton/`). An on-disk skeleton may be
//!   incomplete; a missing template is reported as `None` and callers decide
//!   whether that is fatal.
//! - Example documents (compiled from `templates/`), shown in place of a
//!   document that has never been saved. These always exist.

use crate::error::{ConfigError, ConfigResult};
use crate::types::ConfigKind;
use std::path::PathBuf;

/// Embedded template content (compiled into binary).
pub mod embedded {
    pub const SERVICES: &str = include_str!("../skeleton/services.yaml");
    pub const BOOKMARKS: &str = include_str!("../skeleton/bookmarks.yaml");
    pub const WIDGETS: &str = include_str!("../skeleton/widgets.yaml");
    pub const SETTINGS: &str = include_str!("../skeleton/settings.yaml");
}

/// Example documents shown for unsaved configuration.
pub mod examples {
    pub const SERVICES: &str = include_str!("../templates/services.yaml");
    pub const BOOKMARKS: &str = include_str!("../templates/bookmarks.yaml");
    pub const WIDGETS: &str = include_str!("../templates/widgets.yaml");
    pub const SETTINGS: &str = include_str!("../templates/settings.yaml");
}

/// Get the example document for a kind.
pub fn example_template(kind: ConfigKind) -> &'static str {
    match kind {
        ConfigKind::Services => examples::SERVICES,
        ConfigKind::Bookmarks => examples::BOOKMARKS,
        ConfigKind::Widgets => examples::WIDGETS,
        ConfigKind::Settings => examples::SETTINGS,
    }
}

/// Source of skeleton documents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Skeleton {
    /// Templates compiled into the binary.
    #[default]
    Embedded,
    /// Templates read from a directory; individual files may be absent.
    Directory(PathBuf),
}

impl Skeleton {
    /// Build a skeleton source from an optional configured directory.
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        match dir {
            Some(dir) => Skeleton::Directory(dir),
            None => Skeleton::Embedded,
        }
    }

    /// Get the template text for a kind, or `None` if the template is missing.
    pub fn template(&self, kind: ConfigKind) -> ConfigResult<Option<String>> {
        match self {
            Skeleton::Embedded => Ok(Some(embedded_template(kind).to_string())),
            Skeleton::Directory(dir) => {
                let path = dir.join(kind.file_name());
                match std::fs::read_to_string(&path) {
                    Ok(content) => Ok(Some(content)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(ConfigError::io(&path, e)),
                }
            }
        }
    }

    /// Human-readable location, for log messages.
    pub fn describe(&self) -> String {
        match self {
            Skeleton::Embedded => "embedded".to_string(),
            Skeleton::Directory(dir) => dir.display().to_string(),
        }
    }
}

fn embedded_template(kind: ConfigKind) -> &'static str {
    match kind {
        ConfigKind::Services => embedded::SERVICES,
        ConfigKind::Bookmarks => embedded::BOOKMARKS,
        ConfigKind::Widgets => embedded::WIDGETS,
        ConfigKind::Settings => embedded::SETTINGS,
    }
}
