//! Environment substitution for configuration text.
//!
//! Replaces `{{NAME}}` markers with values taken from the environment:
//! - `HOMEPAGE_VAR_*` variables substitute their value directly
//! - `HOMEPAGE_FILE_*` variables name a file whose contents are substituted
//!
//! The set of recognized variables is captured once per engine, on the first
//! substitution that actually needs it, and never refreshed.

use crate::error::{ConfigError, ConfigResult};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::debug;

/// Prefix of variables substituted by value.
pub const VAR_PREFIX: &str = "HOMEPAGE_VAR_";

/// Prefix of variables substituted by the contents of the file they name.
pub const FILE_PREFIX: &str = "HOMEPAGE_FILE_";

const MARKER_OPEN: &str = "{{";

/// A recognized environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EnvEntry {
    Value { key: String, value: String },
    File { key: String, path: PathBuf },
}

impl EnvEntry {
    fn classify(key: String, value: String) -> Option<Self> {
        if !key.contains(VAR_PREFIX) && !key.contains(FILE_PREFIX) {
            return None;
        }
        if key.starts_with(VAR_PREFIX) {
            Some(EnvEntry::Value { key, value })
        } else if key.starts_with(FILE_PREFIX) {
            Some(EnvEntry::File {
                key,
                path: PathBuf::from(value),
            })
        } else {
            // Contains a prefix but does not start with one: never substituted.
            None
        }
    }

    fn marker(&self) -> String {
        let key = match self {
            EnvEntry::Value { key, .. } | EnvEntry::File { key, .. } => key,
        };
        format!("{{{{{}}}}}", key)
    }
}

/// Where the engine takes its variables from.
#[derive(Debug)]
enum EnvSource {
    Process,
    Fixed(Vec<(String, String)>),
}

/// Substitution engine holding a lazily captured environment snapshot.
#[derive(Debug)]
pub struct EnvSubstitution {
    source: EnvSource,
    snapshot: OnceLock<Vec<EnvEntry>>,
}

impl EnvSubstitution {
    /// Engine reading the process environment on first use.
    pub fn from_process_env() -> Self {
        Self {
            source: EnvSource::Process,
            snapshot: OnceLock::new(),
        }
    }

    /// Engine over an explicit set of variables (for embedding and tests).
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            source: EnvSource::Fixed(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            snapshot: OnceLock::new(),
        }
    }

    /// Whether the snapshot has been captured yet.
    pub fn is_snapshot_loaded(&self) -> bool {
        self.snapshot.get().is_some()
    }

    fn snapshot(&self) -> &[EnvEntry] {
        self.snapshot.get_or_init(|| {
            let entries: Vec<EnvEntry> = match &self.source {
                EnvSource::Process => std::env::vars_os()
                    .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                    .filter_map(|(k, v)| EnvEntry::classify(k, v))
                    .collect(),
                EnvSource::Fixed(vars) => vars
                    .iter()
                    .filter_map(|(k, v)| EnvEntry::classify(k.clone(), v.clone()))
                    .collect(),
            };
            debug!(count = entries.len(), "Captured substitution variables");
            entries
        })
    }

    /// Substitute every recognized `{{NAME}}` marker in `text`.
    ///
    /// Text without any `{{` is returned untouched. Substituted values are
    /// not rescanned. Fails if a file-backed variable names an unreadable file.
    pub fn substitute(&self, text: &str) -> ConfigResult<String> {
        if !text.contains(MARKER_OPEN) {
            return Ok(text.to_string());
        }

        let mut result = text.to_string();
        for entry in self.snapshot() {
            let marker = entry.marker();
            match entry {
                EnvEntry::Value { value, .. } => {
                    result = result.replace(&marker, value);
                }
                EnvEntry::File { path, .. } => {
                    let contents =
                        std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
                    result = result.replace(&marker, &contents);
                }
            }
        }
        Ok(result)
    }
}

impl Default for EnvSubstitution {
    fn default() -> Self {
        Self::from_process_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_no_markers_skips_snapshot() {
        let engine = EnvSubstitution::with_vars([("HOMEPAGE_VAR_TITLE", "My Site")]);
        assert_eq!(engine.substitute("no markers here").unwrap(), "no markers here");
        assert!(!engine.is_snapshot_loaded());
    }

    #[test]
    fn test_direct_substitution() {
        let engine = EnvSubstitution::with_vars([("HOMEPAGE_VAR_TITLE", "My Site")]);
        assert_eq!(engine.substitute("{{HOMEPAGE_VAR_TITLE}}").unwrap(), "My Site");
        assert!(engine.is_snapshot_loaded());
    }

    #[test]
    fn test_unset_marker_left_untouched() {
        let engine = EnvSubstitution::with_vars(Vec::<(String, String)>::new());
        assert_eq!(
            engine.substitute("title: {{HOMEPAGE_VAR_TITLE}}").unwrap(),
            "title: {{HOMEPAGE_VAR_TITLE}}"
        );
    }

    #[test]
    fn test_all_occurrences_replaced() {
        let engine = EnvSubstitution::with_vars([("HOMEPAGE_VAR_HOST", "nas.lan")]);
        let text = "a: http://{{HOMEPAGE_VAR_HOST}}/\nb: https://{{HOMEPAGE_VAR_HOST}}:8443/";
        assert_eq!(
            engine.substitute(text).unwrap(),
            "a: http://nas.lan/\nb: https://nas.lan:8443/"
        );
    }

    #[test]
    fn test_unrelated_variables_ignored() {
        let engine = EnvSubstitution::with_vars([
            ("PATH", "/usr/bin"),
            ("X_HOMEPAGE_VAR_Y", "nope"),
        ]);
        assert_eq!(
            engine.substitute("{{PATH}} {{X_HOMEPAGE_VAR_Y}}").unwrap(),
            "{{PATH}} {{X_HOMEPAGE_VAR_Y}}"
        );
    }

    #[test]
    fn test_no_recursive_substitution() {
        let engine = EnvSubstitution::with_vars([
            ("HOMEPAGE_VAR_A", "{{HOMEPAGE_VAR_B}}"),
            ("HOMEPAGE_VAR_B", "b"),
        ]);
        // A is replaced first; its value is not rescanned, but B still applies
        // to the whole text afterwards in snapshot order.
        assert_eq!(engine.substitute("{{HOMEPAGE_VAR_A}}").unwrap(), "b");

        let engine = EnvSubstitution::with_vars([
            ("HOMEPAGE_VAR_B", "b"),
            ("HOMEPAGE_VAR_A", "{{HOMEPAGE_VAR_B}}"),
        ]);
        assert_eq!(
            engine.substitute("{{HOMEPAGE_VAR_A}}").unwrap(),
            "{{HOMEPAGE_VAR_B}}"
        );
    }

    #[test]
    fn test_file_substitution() {
        let temp = TempDir::new().unwrap();
        let secret = temp.path().join("api_key");
        std::fs::write(&secret, "s3cr3t").unwrap();

        let engine = EnvSubstitution::with_vars([(
            "HOMEPAGE_FILE_API_KEY",
            secret.to_string_lossy().to_string(),
        )]);
        assert_eq!(
            engine.substitute("key: {{HOMEPAGE_FILE_API_KEY}}").unwrap(),
            "key: s3cr3t"
        );
    }

    #[test]
    fn test_unreadable_file_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");

        let engine = EnvSubstitution::with_vars([(
            "HOMEPAGE_FILE_API_KEY",
            missing.to_string_lossy().to_string(),
        )]);
        let err = engine.substitute("key: {{HOMEPAGE_FILE_API_KEY}}").unwrap_err();
        assert_eq!(err.code, ErrorCode::IoError);
    }
}
