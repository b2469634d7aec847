use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use tunesync_core::modules::local_store::FileKeyValueStore;

use crate::cli::{ConfigCommands, DataCommands, SyncCommands};
use crate::{config_commands, data_commands, sync_commands};

/// Subdirectory of the data dir holding the local key-value store.
pub const LOCAL_STORE_DIR: &str = "local";

pub fn open_local_store(data_dir: &Path) -> Result<Arc<FileKeyValueStore>> {
    Ok(Arc::new(FileKeyValueStore::new(data_dir.join(LOCAL_STORE_DIR))?))
}

pub async fn handle_sync_command(data_dir: &Path, cmd: SyncCommands) -> Result<()> {
    let local = open_local_store(data_dir)?;
    match cmd {
        SyncCommands::Run { strategy, dry_run, json } => {
            sync_commands::run_sync(local, strategy.as_deref(), dry_run, json).await
        },
        SyncCommands::Upload { dry_run, json } => {
            sync_commands::upload(local, dry_run, json).await
        },
        SyncCommands::Download { apply, json } => {
            sync_commands::download(local, apply, json).await
        },
        SyncCommands::Test => sync_commands::test(local.as_ref()).await,
        SyncCommands::List => sync_commands::list(local.as_ref()).await,
        SyncCommands::Migrate { path } => sync_commands::migrate(local, path).await,
    }
}

pub fn handle_data_command(data_dir: &Path, cmd: DataCommands) -> Result<()> {
    let local = open_local_store(data_dir)?;
    match cmd {
        DataCommands::Export { output } => {
            data_commands::export_data(local.as_ref(), output.as_deref())
        },
        DataCommands::Import { file } => data_commands::import_data(local.as_ref(), &file),
    }
}

pub fn handle_config_command(data_dir: &Path, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => {
            let local = open_local_store(data_dir)?;
            config_commands::show_config(data_dir, local.as_ref(), json)
        },
        ConfigCommands::Set { key, value } => {
            let local = open_local_store(data_dir)?;
            config_commands::set_config_value(data_dir, local.as_ref(), &key, &value)
        },
    }
}
