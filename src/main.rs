//! Dashboard Configuration Manager
//!
//! Serves the dashboard registry and configuration documents over HTTP,
//! and offers CLI commands that drive the same store.

use anyhow::Result;
use clap::Parser;
use dashboard_config::api::{self, ApiServer};
use dashboard_config::cli::{Cli, Command, check, dashboards};
use dashboard_config::config::{AppConfig, ConfigLoader, ConfigPaths};
use dashboard_config::logging::{LogTarget, init_logging};
use dashboard_config::paths::ConfigLayout;
use dashboard_config::skeleton::Skeleton;
use dashboard_config::store::ConfigStore;
use dashboard_config::substitution::EnvSubstitution;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let target: LogTarget = cli.log.parse()?;
    init_logging(&target, cli.verbose)?;

    // Load configuration with tier merging; --config selects an explicit file
    let mut paths = ConfigPaths::discover();
    if let Some(config_path) = &cli.config {
        paths = paths.with_explicit(config_path);
    }
    let mut loader = ConfigLoader::load_with_paths(paths)?;
    for source in loader.sources() {
        debug!(path = %source.display(), "Using config file");
    }

    // Get mutable reference to apply CLI overrides
    let config = loader.config_mut();
    if let Some(dir) = &cli.config_dir {
        config.paths.config_dir = dir.clone();
    }
    if let Some(dir) = &cli.skeleton_dir {
        config.paths.skeleton_dir = Some(dir.clone());
    }
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let config = loader.into_config();

    let store = open_store(&config);

    // Handle subcommands
    match cli.command {
        Some(Command::List(args)) => dashboards::run_list(&store, &args)?,
        Some(Command::Create(args)) => dashboards::run_create(&store, &args)?,
        Some(Command::Delete(args)) => dashboards::run_delete(&store, &args)?,
        Some(Command::Check(args)) => check::run_check(&store, &args)?,
        Some(Command::Serve) | None => run_server(&config, store).await?,
    }

    Ok(())
}

/// Build the store for the configured root and skeleton.
fn open_store(config: &AppConfig) -> ConfigStore {
    ConfigStore::with_parts(
        ConfigLayout::new(&config.paths.config_dir),
        Skeleton::from_dir(config.paths.skeleton_dir.clone()),
        EnvSubstitution::from_process_env(),
    )
}

/// Bootstrap the default settings and run the API until Ctrl-C.
async fn run_server(config: &AppConfig, store: ConfigStore) -> Result<()> {
    info!(
        config_dir = %store.layout().root().display(),
        skeleton = %store.skeleton().describe(),
        "Starting configuration API"
    );

    // The server cannot run without the top-level settings.yaml
    store.bootstrap_default_settings()?;

    let state = ApiServer::new(store).with_cors(config.server.cors);
    let handle = api::start_server(state, &config.listen_addr()).await?;

    tokio::signal::ctrl_c().await?;
    info!("Interrupt received");
    handle.shutdown().await?;

    Ok(())
}
