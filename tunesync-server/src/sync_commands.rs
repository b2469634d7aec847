use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use tunesync_core::modules::local_data::{
    load_local_data, load_play_counts, save_play_counts, write_local_data,
};
use tunesync_core::modules::local_store::KeyValueStore;
use tunesync_core::sync::{
    list_sync_files, pick_winner, test_connection, upload_snapshot, EntityState, MemoryStore,
    MigrationOutcome, SyncEngine, UploadReport, Winner,
};
use tunesync_types::models::sync::LEGACY_DATA_PATH;
use tunesync_types::{ConflictStrategy, WebDavConfig};

/// Parse a `--strategy` value. Unlike stored settings, unknown names are an error here.
pub fn parse_strategy(value: &str) -> Result<ConflictStrategy> {
    match value {
        "server_wins" | "client_wins" | "last_write_wins" => {
            Ok(ConflictStrategy::from_string(value))
        },
        _ => anyhow::bail!(
            "Unknown strategy '{}' (expected server_wins, client_wins or last_write_wins)",
            value
        ),
    }
}

/// Legacy snapshot location: explicit path, else settings, else the default.
pub fn legacy_path(explicit: Option<String>, settings: &WebDavConfig) -> String {
    explicit
        .filter(|p| !p.trim().is_empty())
        .or_else(|| Some(settings.remote_path.clone()).filter(|p| !p.trim().is_empty()))
        .unwrap_or_else(|| LEGACY_DATA_PATH.to_string())
}

fn configured_settings(local: &dyn KeyValueStore) -> Result<WebDavConfig> {
    let webdav = load_local_data(local)?.settings.webdav;
    if !webdav.is_configured() {
        anyhow::bail!("WebDAV is not configured. Run: tunesync config set webdav.url <url>");
    }
    Ok(webdav)
}

fn print_upload_report(report: &UploadReport) {
    for (entity, state) in &report.entities {
        let mark = match state {
            EntityState::Written => "✓".green(),
            EntityState::Failed => "✗".red(),
            EntityState::Pending => "-".dimmed(),
        };
        println!("  {} {}", mark, entity.file_path());
    }
    let meta = if report.metadata_written { "✓".green() } else { "-".dimmed() };
    println!("  {} metadata", meta);
    if let Some(err) = &report.error {
        println!("  {} {}", "Error:".red().bold(), err);
    }
}

pub async fn run_sync(
    local: Arc<dyn KeyValueStore>,
    strategy: Option<&str>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let webdav = configured_settings(local.as_ref())?;
    let strategy = match strategy {
        Some(s) => Some(parse_strategy(s)?),
        None => webdav.conflict_strategy,
    };
    let engine = SyncEngine::from_local_settings(Arc::clone(&local))?;

    if dry_run {
        let local_snapshot = load_local_data(local.as_ref())?;
        let remote = engine.download().await;
        let winner = if remote.is_empty() {
            Winner::Local
        } else {
            pick_winner(&local_snapshot, &remote.snapshot, strategy)
        };

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "winner": winner,
                    "remoteFound": !remote.is_empty(),
                    "localUpdatedAt": local_snapshot.updated_at,
                    "remoteUpdatedAt": remote.snapshot.updated_at,
                }))?
            );
        } else {
            println!("{}", "Sync dry run".cyan().bold());
            println!("  Strategy: {}", strategy.unwrap_or(ConflictStrategy::LastWriteWins));
            println!("  Local updatedAt:  {}", local_snapshot.updated_at);
            if remote.is_empty() {
                println!("  Remote: {}", "no sync data".dimmed());
            } else {
                println!("  Remote updatedAt: {}", remote.snapshot.updated_at);
            }
            println!("  Winner: {:?}", winner);
        }
        return Ok(());
    }

    let outcome = engine.sync_once(strategy).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!(
            "{} Sync finished: {:?} snapshot kept (remote found: {})",
            "✓".green(),
            outcome.winner,
            outcome.remote_found
        );
        print_upload_report(&outcome.upload);
    }

    match outcome.upload.error {
        Some(err) => Err(anyhow::anyhow!("Upload incomplete: {}", err)),
        None => Ok(()),
    }
}

pub async fn upload(local: Arc<dyn KeyValueStore>, dry_run: bool, json: bool) -> Result<()> {
    if dry_run {
        let snapshot = load_local_data(local.as_ref())?;
        let play_counts = load_play_counts(local.as_ref())?;
        let store = MemoryStore::new();
        let report = upload_snapshot(&store, &snapshot, &play_counts).await;

        let mut files = Vec::new();
        for path in store.write_log().await {
            let size = store.get(&path).await.map_or(0, |body| body.len());
            files.push((path, size));
        }

        if json {
            let files: Vec<_> = files
                .iter()
                .map(|(path, size)| serde_json::json!({"path": path, "size": size}))
                .collect();
            println!("{}", serde_json::to_string_pretty(&files)?);
        } else {
            println!("{}", "Upload dry run (nothing sent)".cyan().bold());
            for (path, size) in &files {
                println!("  {} ({} bytes)", path, size);
            }
            println!("  Session updatedAt: {}", report.updated_at);
        }
        return Ok(());
    }

    configured_settings(local.as_ref())?;
    let engine = SyncEngine::from_local_settings(local)?;
    let report = engine.upload().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} Uploaded local data", "✓".green());
        print_upload_report(&report);
    }
    Ok(())
}

pub async fn download(local: Arc<dyn KeyValueStore>, apply: bool, json: bool) -> Result<()> {
    configured_settings(local.as_ref())?;
    let engine = SyncEngine::from_local_settings(Arc::clone(&local))?;
    let remote = engine.download().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&remote)?);
    } else {
        println!("{}", "Remote data".cyan().bold());
        println!("  updatedAt: {}", remote.snapshot.updated_at);
        println!("  Favorite songs: {}", remote.snapshot.favorites.songs.len());
        println!("  History entries: {}", remote.snapshot.history.songs.len());
        println!("  Playlists: {}", remote.snapshot.playlists.len());
        println!("  Play counts: {}", remote.play_counts.len());
        if !remote.missing.is_empty() {
            let missing: Vec<_> = remote.missing.iter().map(|e| e.key()).collect();
            println!("  {} {}", "Defaulted:".yellow(), missing.join(", "));
        }
    }

    if apply {
        if remote.is_empty() {
            anyhow::bail!("Remote store has no sync data; local data left untouched");
        }
        write_local_data(local.as_ref(), &remote.snapshot)?;
        save_play_counts(local.as_ref(), &remote.play_counts)?;
        if !json {
            println!("{} Local data replaced with remote snapshot", "✓".green());
        }
    }
    Ok(())
}

pub async fn test(local: &dyn KeyValueStore) -> Result<()> {
    let webdav = configured_settings(local)?;
    if test_connection(&webdav).await {
        println!("{} Connected to {}", "✓".green(), webdav.url);
        Ok(())
    } else {
        anyhow::bail!("Could not reach {}", webdav.url)
    }
}

pub async fn list(local: &dyn KeyValueStore) -> Result<()> {
    let webdav = configured_settings(local)?;
    let files = list_sync_files(&webdav).await;
    if files.is_empty() {
        println!("{}", "No files found".dimmed());
    }
    for name in files {
        println!("  {}", name);
    }
    Ok(())
}

pub async fn migrate(local: Arc<dyn KeyValueStore>, path: Option<String>) -> Result<()> {
    let webdav = configured_settings(local.as_ref())?;
    let path = legacy_path(path, &webdav);
    let engine = SyncEngine::from_local_settings(local)?;

    match engine.migrate_legacy(&path).await? {
        MigrationOutcome::NothingToMigrate => {
            println!("{} No legacy data at {}", "-".dimmed(), path);
        },
        MigrationOutcome::Unsupported { reason } => {
            println!("{} Legacy data at {} left in place: {}", "!".yellow(), path, reason);
        },
        MigrationOutcome::Migrated { upload } => {
            println!("{} Migrated {} to the multi-file layout", "✓".green(), path);
            print_upload_report(&upload);
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tunesync_core::modules::local_store::MemoryKeyValueStore;

    #[test]
    fn test_parse_strategy() {
        assert_eq!(parse_strategy("client_wins").unwrap(), ConflictStrategy::ClientWins);
        assert_eq!(parse_strategy("last_write_wins").unwrap(), ConflictStrategy::LastWriteWins);
        assert!(parse_strategy("newest").is_err());
    }

    #[test]
    fn test_legacy_path_precedence() {
        let mut settings = WebDavConfig::default();
        assert_eq!(legacy_path(Some("/x.json".to_string()), &settings), "/x.json");

        settings.remote_path = "/old/data.json".to_string();
        assert_eq!(legacy_path(None, &settings), "/old/data.json");

        settings.remote_path = "  ".to_string();
        assert_eq!(legacy_path(None, &settings), LEGACY_DATA_PATH);
    }

    #[tokio::test]
    async fn test_unconfigured_commands_fail_early() {
        let local: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        assert!(run_sync(Arc::clone(&local), None, false, true).await.is_err());
        assert!(download(Arc::clone(&local), false, true).await.is_err());
        assert!(list(local.as_ref()).await.is_err());
    }

    #[tokio::test]
    async fn test_upload_dry_run_needs_no_remote() {
        let local: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        assert!(upload(local, true, true).await.is_ok());
    }
}
