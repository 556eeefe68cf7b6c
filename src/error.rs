//! Structured error types for registry and document operations.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (4xx-like)
    InvalidArgument,
    ValidationError,
    Forbidden,

    // Lookup errors
    NotFound,
    AlreadyExists,

    // Filesystem errors
    StorageError,
    IoError,
}

/// Structured error returned by the configuration store.
#[derive(Debug, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ConfigError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ConfigError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(ErrorCode::InvalidArgument, format!("{} is required", field)).with_field(field)
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::InvalidArgument, reason).with_field(field)
    }

    pub fn invalid_dashboard(dashboard_id: &str) -> Self {
        Self::new(
            ErrorCode::InvalidArgument,
            format!("Invalid dashboard ID: {}", dashboard_id),
        )
        .with_field("dashboardId")
    }

    pub fn invalid_kind(kind: &str) -> Self {
        Self::new(
            ErrorCode::InvalidArgument,
            format!(
                "Invalid config type '{}'. Must be one of: services, bookmarks, widgets, settings",
                kind
            ),
        )
        .with_field("configType")
    }

    pub fn dashboard_exists(dashboard_id: &str) -> Self {
        Self::new(
            ErrorCode::AlreadyExists,
            format!("Dashboard with ID \"{}\" already exists", dashboard_id),
        )
    }

    pub fn dashboard_not_found(dashboard_id: &str) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("Dashboard with ID \"{}\" does not exist", dashboard_id),
        )
    }

    pub fn document_not_found(path: &std::path::Path) -> Self {
        Self::new(ErrorCode::NotFound, "Configuration file not found")
            .with_details(path.display().to_string())
    }

    pub fn default_protected() -> Self {
        Self::new(ErrorCode::Forbidden, "Cannot delete the default dashboard")
    }

    /// YAML syntax failure; the parser diagnostic is kept verbatim.
    pub fn invalid_yaml(err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ValidationError,
            format!("Invalid YAML syntax: {}", err),
        )
    }

    pub fn storage(context: &str, err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::StorageError, format!("{}: {}", context, err))
    }

    pub fn io(path: &std::path::Path, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::IoError,
            format!("Failed to read {}: {}", path.display(), err),
        )
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::new(ErrorCode::StorageError, err.to_string())
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for ConfigError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ConfigError>() {
            Ok(config_err) => config_err,
            Err(err) => ConfigError::new(ErrorCode::StorageError, err.to_string()),
        }
    }
}

/// Result type for store operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
