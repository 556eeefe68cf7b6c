//! Configuration loader with tier-based merging.
//!
//! Loads application configuration from multiple tiers and merges them
//! field-by-field.

use super::merge::deep_merge_all;
use super::types::AppConfig;
use anyhow::{Context, Result};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the project-level configuration file.
pub const PROJECT_CONFIG_FILE: &str = "dashboard-config.yaml";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Built-in defaults (lowest priority)
    Defaults = 0,
    /// User-level config (~/.config/dashboard-config/config.yaml)
    User = 1,
    /// Project-level config (./dashboard-config.yaml)
    Project = 2,
    /// Environment variables (highest priority)
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Locations of the configuration files for each tier.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Explicit config file; replaces the user and project tiers when set.
    pub explicit_file: Option<PathBuf>,
    /// User-level config file
    pub user_file: Option<PathBuf>,
    /// Project-level config file
    pub project_file: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        let explicit_file = std::env::var("DASHBOARD_CONFIG_PATH")
            .ok()
            .map(PathBuf::from);
        let user_file = dirs::config_dir().map(|d| d.join("dashboard-config").join("config.yaml"));
        let project_file = Some(PathBuf::from(PROJECT_CONFIG_FILE));

        Self {
            explicit_file,
            user_file,
            project_file,
        }
    }

    /// Create paths with explicit files.
    pub fn with_files(user_file: Option<PathBuf>, project_file: Option<PathBuf>) -> Self {
        Self {
            explicit_file: None,
            user_file,
            project_file,
        }
    }

    /// Use a single explicit file instead of the user and project tiers.
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Paths for each tier
    pub paths: ConfigPaths,
    config: AppConfig,
    /// Config files that contributed, lowest tier first
    sources: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration with explicit paths and the process environment.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        Self::load_with_env(paths, |key| std::env::var(key).ok())
    }

    /// Load configuration with explicit paths and environment lookup.
    pub fn load_with_env(paths: ConfigPaths, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut layers: Vec<Value> = Vec::new();
        let mut sources = Vec::new();

        // Tier 1: Defaults
        layers.push(serde_yaml::to_value(AppConfig::default())?);

        if let Some(ref explicit) = paths.explicit_file {
            // An explicit file must exist and parse.
            layers.push(read_yaml_file(explicit)?);
            sources.push(explicit.clone());
        } else {
            // Tiers 2 and 3: User then project files, skipped when absent or broken
            for (tier, file) in [
                (ConfigTier::User, &paths.user_file),
                (ConfigTier::Project, &paths.project_file),
            ] {
                let Some(file) = file else { continue };
                if !file.exists() {
                    continue;
                }
                match read_yaml_file(file) {
                    Ok(value) => {
                        debug!(tier = %tier, path = %file.display(), "Loaded config file");
                        layers.push(value);
                        sources.push(file.clone());
                    }
                    Err(e) => warn!(tier = %tier, error = %e, "Ignoring unreadable config file"),
                }
            }
        }

        let merged = deep_merge_all(layers);
        let mut config: AppConfig =
            serde_yaml::from_value(merged).context("Invalid application configuration")?;

        // Tier 4: Environment variable overrides
        Self::apply_env_overrides(&mut config, env)?;

        Ok(Self {
            paths,
            config,
            sources,
        })
    }

    /// Apply environment variable overrides to config.
    fn apply_env_overrides(
        config: &mut AppConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(dir) = env("HOMEPAGE_CONFIG_DIR") {
            config.paths.config_dir = PathBuf::from(dir);
        }

        if let Some(dir) = env("HOMEPAGE_SKELETON_DIR") {
            config.paths.skeleton_dir = Some(PathBuf::from(dir));
        }

        if let Some(host) = env("HOMEPAGE_LISTEN_ADDR") {
            config.server.host = host;
        }

        if let Some(port) = env("HOMEPAGE_PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("HOMEPAGE_PORT is not a valid port: {}", port))?;
        }

        Ok(())
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Config files that were merged, lowest tier first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

fn read_yaml_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(value)
}
