//! Reading, writing and bootstrapping configuration documents.

use super::ConfigStore;
use super::fs::write_atomic;
use crate::error::{ConfigError, ConfigResult, ErrorCode};
use crate::skeleton::example_template;
use crate::types::{ConfigDocument, ConfigKind, DEFAULT_DASHBOARD_ID, DocumentSource};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Outcome of bootstrapping a document from the skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// The document already existed.
    Existing,
    /// The skeleton template was copied into place.
    Created,
    /// No skeleton template was available; the document is still absent.
    SkeletonMissing,
}

/// Syntax state of one persisted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    Missing,
    Valid,
    Invalid(String),
}

/// Result of checking one document of a dashboard.
#[derive(Debug, Clone)]
pub struct DocumentCheck {
    pub kind: ConfigKind,
    pub path: PathBuf,
    pub status: DocumentStatus,
}

/// Parse `text` as YAML purely to validate its syntax.
pub fn validate_yaml(text: &str) -> ConfigResult<()> {
    serde_yaml::from_str::<serde_yaml::Value>(text)
        .map(|_| ())
        .map_err(ConfigError::invalid_yaml)
}

/// Read a file as text, with a hard `NotFound` when it does not exist.
pub fn read_raw(path: &Path) -> ConfigResult<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::document_not_found(path))
        }
        Err(e) => Err(ConfigError::io(path, e)),
    }
}

impl ConfigStore {
    /// Path of a document. The id must already be validated.
    pub fn document_path(&self, dashboard_id: &str, kind: ConfigKind) -> PathBuf {
        self.layout().document_path(Some(dashboard_id), kind)
    }

    /// Read a document for display.
    ///
    /// A document that was never saved yields the example template, marked
    /// as `DocumentSource::Template`.
    pub fn read_document(&self, dashboard_id: &str, kind: ConfigKind) -> ConfigResult<ConfigDocument> {
        self.require_dashboard(dashboard_id)?;

        let path = self.document_path(dashboard_id, kind);
        match read_raw(&path) {
            Ok(content) => Ok(ConfigDocument {
                kind,
                content,
                source: DocumentSource::Persisted,
            }),
            Err(e) if e.code == ErrorCode::NotFound => Ok(ConfigDocument {
                kind,
                content: example_template(kind).to_string(),
                source: DocumentSource::Template,
            }),
            Err(e) => Err(e),
        }
    }

    /// Read the persisted text of a document, failing with `NotFound` when
    /// it has never been saved.
    pub fn read_persisted(&self, dashboard_id: &str, kind: ConfigKind) -> ConfigResult<String> {
        self.require_dashboard(dashboard_id)?;
        read_raw(&self.document_path(dashboard_id, kind))
    }

    /// Validate and save a document, returning the path written.
    ///
    /// Nothing touches the filesystem unless both the dashboard id and the
    /// YAML syntax are valid.
    pub fn write_document(
        &self,
        dashboard_id: &str,
        kind: ConfigKind,
        content: &str,
    ) -> ConfigResult<PathBuf> {
        self.require_dashboard(dashboard_id)?;
        validate_yaml(content)?;

        let path = self.document_path(dashboard_id, kind);
        write_atomic(&path, content)
            .map_err(|e| ConfigError::storage("Failed to save configuration", e))?;

        info!(dashboard = %dashboard_id, kind = %kind, path = %path.display(), "Saved configuration");
        Ok(path)
    }

    /// Copy the skeleton template into place if the document is absent.
    pub fn ensure_bootstrapped(&self, dashboard_id: &str, kind: ConfigKind) -> ConfigResult<Bootstrap> {
        let path = self.document_path(dashboard_id, kind);
        if path.exists() {
            return Ok(Bootstrap::Existing);
        }

        let Some(template) = self.skeleton().template(kind)? else {
            debug!(dashboard = %dashboard_id, kind = %kind, "No skeleton template to bootstrap from");
            return Ok(Bootstrap::SkeletonMissing);
        };

        write_atomic(&path, &template)
            .map_err(|e| ConfigError::storage("Failed to initialize config", e))?;
        info!("{} was copied to the config folder", path.display());
        Ok(Bootstrap::Created)
    }

    /// Bootstrap the top-level `settings.yaml`. The server cannot run
    /// without it, so a missing skeleton is an error here.
    pub fn bootstrap_default_settings(&self) -> ConfigResult<()> {
        let path = self.document_path(DEFAULT_DASHBOARD_ID, ConfigKind::Settings);
        let outcome = self.ensure_bootstrapped(DEFAULT_DASHBOARD_ID, ConfigKind::Settings);

        match outcome {
            Ok(Bootstrap::Existing) | Ok(Bootstrap::Created) => Ok(()),
            Ok(Bootstrap::SkeletonMissing) => {
                error!(
                    path = %path.display(),
                    skeleton = %self.skeleton().describe(),
                    "Failed to initialize required config: skeleton settings.yaml is missing"
                );
                Err(ConfigError::storage(
                    "Failed to initialize required config",
                    path.display(),
                )
                .with_details("Make the config directory writable or place settings.yaml there manually"))
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to initialize required config");
                Err(e.with_details(
                    "Make the config directory writable or place settings.yaml there manually",
                ))
            }
        }
    }

    /// Load a document as a structured value, with environment substitution
    /// applied. An absent document with no skeleton yields `Null`.
    pub fn load_document(&self, dashboard_id: &str, kind: ConfigKind) -> ConfigResult<serde_yaml::Value> {
        self.require_dashboard(dashboard_id)?;
        self.ensure_bootstrapped(dashboard_id, kind)?;

        let raw = match read_raw(&self.document_path(dashboard_id, kind)) {
            Ok(raw) => raw,
            Err(e) if e.code == ErrorCode::NotFound => {
                return Ok(serde_yaml::Value::Null);
            }
            Err(e) => return Err(e),
        };
        let text = self.env().substitute(&raw)?;
        serde_yaml::from_str(&text).map_err(ConfigError::invalid_yaml)
    }

    /// Check the syntax of every persisted document of a dashboard.
    pub fn check_dashboard(&self, dashboard_id: &str) -> ConfigResult<Vec<DocumentCheck>> {
        self.require_dashboard(dashboard_id)?;

        let checks = ConfigKind::ALL
            .iter()
            .map(|&kind| {
                let path = self.document_path(dashboard_id, kind);
                let status = match read_raw(&path) {
                    Ok(content) => match validate_yaml(&content) {
                        Ok(()) => DocumentStatus::Valid,
                        Err(e) => DocumentStatus::Invalid(e.message),
                    },
                    Err(e) if e.code == ErrorCode::NotFound => DocumentStatus::Missing,
                    Err(e) => DocumentStatus::Invalid(e.message),
                };
                DocumentCheck { kind, path, status }
            })
            .collect();
        Ok(checks)
    }
}
