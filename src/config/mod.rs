//! Application configuration.
//!
//! Consolidates configuration from four tiers with field-by-field YAML merging:
//! 1. **Defaults** - Built into the binary
//! 2. **User** - `~/.config/dashboard-config/config.yaml`
//! 3. **Project** - `./dashboard-config.yaml`
//! 4. **Environment** - variables listed below
//!
//! Command-line flags are applied by the binary after loading.
//!
//! ## Environment Variables
//! - `DASHBOARD_CONFIG_PATH` - Explicit config file (replaces user and project tiers)
//! - `HOMEPAGE_CONFIG_DIR` - Root of the dashboard configuration files
//! - `HOMEPAGE_SKELETON_DIR` - Directory of skeleton templates
//! - `HOMEPAGE_LISTEN_ADDR` - Address the API binds to
//! - `HOMEPAGE_PORT` - Port the API listens on

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier, PROJECT_CONFIG_FILE};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
