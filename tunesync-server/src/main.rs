//! TuneSync Server - Headless Daemon
//!
//! A pure Rust HTTP server and CLI that:
//! - Forwards browser WebDAV calls through `/api/webdav-proxy/*`
//! - Synchronizes local data with a WebDAV store as one file per entity
//! - Optionally runs that sync on a timer
//!
//! Access via: http://localhost:8046

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod auto_sync;
mod cli;
mod commands;
mod config_commands;
mod data_commands;
mod router;
mod server_utils;
mod sync_commands;

use cli::{Cli, Commands, ServeArgs};
use tunesync_core::modules::{config as core_config, logger, paths};
use tunesync_core::proxy::Forwarder;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(&cli.log_level).map_err(|e| anyhow::anyhow!(e))?;

    let data_dir = match cli.data_dir {
        Some(dir) => paths::ensure_dir(&dir),
        None => paths::get_data_dir(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to get data directory: {}", e))?;

    match cli.command {
        None => run_server(&data_dir, ServeArgs::default()).await,
        Some(Commands::Serve(args)) => run_server(&data_dir, args).await,
        Some(Commands::Sync(cmd)) => commands::handle_sync_command(&data_dir, cmd).await,
        Some(Commands::Data(cmd)) => commands::handle_data_command(&data_dir, cmd),
        Some(Commands::Config(cmd)) => commands::handle_config_command(&data_dir, cmd),
    }
}

async fn run_server(data_dir: &Path, args: ServeArgs) -> Result<()> {
    let mut config = core_config::load_config_from(data_dir).map_err(|e| anyhow::anyhow!(e))?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.lan {
        config.allow_lan_access = true;
    }
    if let Some(mount) = args.mount {
        config.proxy_mount = mount;
    }
    if let Some(timeout) = args.upstream_timeout {
        config.upstream_timeout = timeout;
    }

    let mount = config.normalized_mount();
    if mount.len() < 2 {
        anyhow::bail!("Proxy mount must not be the root path");
    }
    info!("🚀 TuneSync Server starting on port {}...", config.port);

    let forwarder = Forwarder::new(
        &mount,
        Duration::from_secs(config.upstream_timeout),
        config.body_limit,
    )
    .map_err(|e| anyhow::anyhow!(e))?;
    let app = router::build_router(Arc::new(forwarder));

    if args.auto_sync {
        let local = commands::open_local_store(data_dir)?;
        auto_sync::start_auto_sync(local, Duration::from_secs(config.auto_sync_interval));
    }

    let listener = server_utils::create_listener(&config).await?;
    info!("📁 Data directory: {}", data_dir.display());
    info!("🔀 Proxy endpoints at http://localhost:{}{}/", config.port, mount);

    axum::serve(listener, app).with_graceful_shutdown(server_utils::shutdown_signal()).await?;

    info!("👋 Server stopped");
    Ok(())
}
