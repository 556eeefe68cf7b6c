//! CLI command definitions for dashboard-config
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod check;
pub mod dashboards;

use check::CheckArgs;
use clap::{Parser, Subcommand};
use dashboards::{CreateArgs, DeleteArgs, ListArgs};
use std::path::PathBuf;

/// Dashboard configuration manager and REST API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to application configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Root of the dashboard configuration files (overrides config)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Directory of skeleton templates (overrides config)
    #[arg(long, global = true)]
    pub skeleton_dir: Option<PathBuf>,

    /// Address to bind the API to (overrides config)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port for the API (overrides config)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the configuration API (default if no subcommand given)
    Serve,

    /// List registered dashboards
    List(ListArgs),

    /// Register a new dashboard
    Create(CreateArgs),

    /// Delete a dashboard and its configuration files
    Delete(DeleteArgs),

    /// Check the YAML syntax of a dashboard's configuration files
    Check(CheckArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_serve() {
        let cli = Cli::parse_from(["dashboard-config"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log, "2");
    }

    #[test]
    fn test_create_with_global_flags() {
        let cli = Cli::parse_from([
            "dashboard-config",
            "create",
            "work",
            "Work Dashboard",
            "--config-dir",
            "/srv/config",
        ]);
        assert_eq!(cli.config_dir, Some(PathBuf::from("/srv/config")));
        match cli.command {
            Some(Command::Create(args)) => {
                assert_eq!(args.id, "work");
                assert_eq!(args.name, "Work Dashboard");
                assert!(args.description.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
