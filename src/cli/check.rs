//! Check subcommand: parse every persisted document of a dashboard and
//! report syntax errors.

use crate::store::{ConfigStore, DocumentCheck, DocumentStatus};
use anyhow::{Result, bail};
use clap::Args;

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Dashboard to check
    #[arg(default_value = "default")]
    pub dashboard: String,

    /// Check every registered dashboard
    #[arg(long, conflicts_with = "dashboard")]
    pub all: bool,
}

/// One report line for a checked document.
pub fn format_check(dashboard_id: &str, check: &DocumentCheck) -> String {
    let status = match &check.status {
        DocumentStatus::Valid => "ok".to_string(),
        DocumentStatus::Missing => "missing".to_string(),
        DocumentStatus::Invalid(reason) => format!("invalid: {}", reason),
    };
    format!("{}/{}: {}", dashboard_id, check.kind.file_name(), status)
}

/// Run the check command. Fails when any document does not parse.
pub fn run_check(store: &ConfigStore, args: &CheckArgs) -> Result<()> {
    let ids: Vec<String> = if args.all {
        store.list_dashboards().into_iter().map(|d| d.id).collect()
    } else {
        vec![args.dashboard.clone()]
    };

    let mut invalid = 0usize;
    for id in &ids {
        for check in store.check_dashboard(id)? {
            if matches!(check.status, DocumentStatus::Invalid(_)) {
                invalid += 1;
            }
            println!("{}", format_check(id, &check));
        }
    }

    if invalid > 0 {
        bail!("{} configuration file(s) failed to parse", invalid);
    }
    Ok(())
}
