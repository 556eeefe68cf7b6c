//! Registry subcommands: list, create and delete dashboards.

use crate::store::ConfigStore;
use crate::types::Dashboard;
use anyhow::Result;
use clap::Args;

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the dashboards as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the create command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Dashboard identifier (lowercase letters, digits, '-' and '_')
    pub id: String,

    /// Display name
    pub name: String,

    /// Optional description
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Arguments for the delete command.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Dashboard identifier
    pub id: String,
}

/// Render dashboards as an aligned text table.
pub fn format_dashboard_table(dashboards: &[Dashboard]) -> String {
    let id_width = dashboards
        .iter()
        .map(|d| d.id.len())
        .chain(std::iter::once("ID".len()))
        .max()
        .unwrap_or(2);

    let mut out = format!("{:<id_width$}  NAME\n", "ID");
    for dashboard in dashboards {
        let marker = if dashboard.is_default { " (default)" } else { "" };
        out.push_str(&format!(
            "{:<id_width$}  {}{}",
            dashboard.id, dashboard.name, marker
        ));
        if let Some(ref description) = dashboard.description {
            out.push_str(&format!(" - {}", description));
        }
        out.push('\n');
    }
    out
}

/// Run the list command.
pub fn run_list(store: &ConfigStore, args: &ListArgs) -> Result<()> {
    let dashboards = store.list_dashboards();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboards)?);
    } else {
        print!("{}", format_dashboard_table(&dashboards));
    }
    Ok(())
}

/// Run the create command.
pub fn run_create(store: &ConfigStore, args: &CreateArgs) -> Result<()> {
    let dashboard = store.create_dashboard(&args.id, &args.name, args.description.as_deref())?;
    println!(
        "Created dashboard '{}' in {}",
        dashboard.id,
        store.layout().dashboard_dir(Some(&dashboard.id)).display()
    );
    Ok(())
}

/// Run the delete command.
pub fn run_delete(store: &ConfigStore, args: &DeleteArgs) -> Result<()> {
    store.delete_dashboard(&args.id)?;
    println!("Deleted dashboard '{}'", args.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_table_marks_default() {
        let dashboards = vec![
            Dashboard::default_dashboard(),
            Dashboard {
                id: "media-server".into(),
                name: "Media".into(),
                description: None,
                is_default: false,
                created_at: None,
            },
        ];
        let table = format_dashboard_table(&dashboards);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("Default Dashboard (default) - Main dashboard"));
        assert!(lines[2].starts_with("media-server  Media"));
    }

    #[test]
    fn test_create_then_delete() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::open(temp.path());

        let create = CreateArgs {
            id: "work".into(),
            name: "Work Dashboard".into(),
            description: None,
        };
        run_create(&store, &create).unwrap();
        assert!(store.dashboard_exists("work"));

        run_delete(&store, &DeleteArgs { id: "work".into() }).unwrap();
        assert!(!store.dashboard_exists("work"));
    }

    #[test]
    fn test_delete_default_fails() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::open(temp.path());
        let err = run_delete(&store, &DeleteArgs { id: "default".into() }).unwrap_err();
        assert!(err.to_string().contains("Cannot delete the default dashboard"));
    }
}
