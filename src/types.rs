//! Core data types for dashboards and configuration documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Identifier reserved for the implicit, always-present dashboard.
pub const DEFAULT_DASHBOARD_ID: &str = "default";

/// A registered dashboard as stored in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Dashboard {
    /// The implicit default dashboard. Never carries a creation time.
    pub fn default_dashboard() -> Self {
        Self {
            id: DEFAULT_DASHBOARD_ID.to_string(),
            name: "Default Dashboard".to_string(),
            description: Some("Main dashboard".to_string()),
            is_default: true,
            created_at: None,
        }
    }

    pub fn is_default_id(id: &str) -> bool {
        id == DEFAULT_DASHBOARD_ID
    }
}

/// On-disk shape of `dashboards.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub dashboards: Vec<Dashboard>,
}

/// The closed set of configuration document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKind {
    Services,
    Bookmarks,
    Widgets,
    Settings,
}

impl ConfigKind {
    pub const ALL: [ConfigKind; 4] = [
        ConfigKind::Bookmarks,
        ConfigKind::Services,
        ConfigKind::Widgets,
        ConfigKind::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKind::Services => "services",
            ConfigKind::Bookmarks => "bookmarks",
            ConfigKind::Widgets => "widgets",
            ConfigKind::Settings => "settings",
        }
    }

    /// File name of the document, e.g. `services.yaml`.
    pub fn file_name(&self) -> &'static str {
        match self {
            ConfigKind::Services => "services.yaml",
            ConfigKind::Bookmarks => "bookmarks.yaml",
            ConfigKind::Widgets => "widgets.yaml",
            ConfigKind::Settings => "settings.yaml",
        }
    }

    /// Parse a file name such as `widgets.yaml` back into a kind.
    pub fn from_file_name(file: &str) -> Result<Self, ConfigError> {
        let stem = file.strip_suffix(".yaml").ok_or_else(|| {
            ConfigError::invalid_value("configFile", "Invalid config file")
        })?;
        stem.parse()
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "services" => Ok(ConfigKind::Services),
            "bookmarks" => Ok(ConfigKind::Bookmarks),
            "widgets" => Ok(ConfigKind::Widgets),
            "settings" => Ok(ConfigKind::Settings),
            other => Err(ConfigError::invalid_kind(other)),
        }
    }
}

/// Where the text of a read document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    /// The document exists on disk.
    Persisted,
    /// The document is absent; the text is the bundled template.
    Template,
}

/// A configuration document as returned by a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    pub kind: ConfigKind,
    pub content: String,
    pub source: DocumentSource,
}

impl ConfigDocument {
    pub fn is_persisted(&self) -> bool {
        self.source == DocumentSource::Persisted
    }
}
