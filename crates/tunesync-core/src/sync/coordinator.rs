//! One full sync cycle and the legacy migration.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use tunesync_types::models::sync::LEGACY_DATA_PATH;
use tunesync_types::{AppSnapshot, ConflictStrategy, PlayCounts, SyncError};

use super::conflict::{pick_winner, Winner};
use super::download::{download_snapshot, RemoteData};
use super::store::RemoteStore;
use super::upload::{upload_snapshot, UploadReport};
use super::webdav::WebDavClient;
use crate::error::{AppError, AppResult};
use crate::modules::local_data::{
    load_local_data, load_play_counts, parse_snapshot, save_play_counts, write_local_data,
};
use crate::modules::local_store::KeyValueStore;

/// Result of [`SyncEngine::sync_once`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub winner: Winner,
    /// False when no entity file existed remotely
    pub remote_found: bool,
    pub upload: UploadReport,
}

/// Result of [`SyncEngine::migrate_legacy`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationOutcome {
    NothingToMigrate,
    Unsupported { reason: String },
    Migrated { upload: UploadReport },
}

/// Ties the local key-value store to a remote store.
pub struct SyncEngine {
    remote: Arc<dyn RemoteStore>,
    local: Arc<dyn KeyValueStore>,
}

impl SyncEngine {
    pub fn new(remote: Arc<dyn RemoteStore>, local: Arc<dyn KeyValueStore>) -> Self {
        Self { remote, local }
    }

    /// Build a WebDAV-backed engine from the locally stored settings.
    pub fn from_local_settings(local: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let settings = load_local_data(local.as_ref())?.settings;
        let client = WebDavClient::new(&settings.webdav)?;
        Ok(Self::new(Arc::new(client), local))
    }

    pub fn remote(&self) -> &dyn RemoteStore {
        self.remote.as_ref()
    }

    fn local_state(&self) -> AppResult<(AppSnapshot, PlayCounts)> {
        Ok((load_local_data(self.local.as_ref())?, load_play_counts(self.local.as_ref())?))
    }

    /// Upload the local snapshot and play counts.
    pub async fn upload(&self) -> AppResult<UploadReport> {
        let (snapshot, play_counts) = self.local_state()?;
        Ok(upload_snapshot(self.remote.as_ref(), &snapshot, &play_counts).await.into_result()?)
    }

    /// Rebuild the remote snapshot without touching local data.
    pub async fn download(&self) -> RemoteData {
        download_snapshot(self.remote.as_ref()).await
    }

    /// Download, resolve against local, persist the winner locally, upload it.
    ///
    /// Play counts travel with the winning side. After a complete upload the
    /// local `updatedAt` matches the uploaded files.
    pub async fn sync_once(&self, strategy: Option<ConflictStrategy>) -> AppResult<SyncOutcome> {
        let (local, local_counts) = self.local_state()?;
        let remote = self.download().await;
        let remote_found = !remote.is_empty();

        let winner = if remote_found {
            pick_winner(&local, &remote.snapshot, strategy)
        } else {
            Winner::Local
        };
        let (mut snapshot, play_counts) = match winner {
            Winner::Local => (local, local_counts),
            Winner::Remote => (remote.snapshot, remote.play_counts),
        };
        info!("Sync: {:?} snapshot wins (remote found: {})", winner, remote_found);

        write_local_data(self.local.as_ref(), &snapshot)?;
        save_play_counts(self.local.as_ref(), &play_counts)?;

        let upload = upload_snapshot(self.remote.as_ref(), &snapshot, &play_counts).await;
        if upload.is_complete() {
            snapshot.updated_at = upload.updated_at;
            write_local_data(self.local.as_ref(), &snapshot)?;
        } else if let Some(err) = &upload.error {
            warn!("Sync upload incomplete: {}", err);
        }

        Ok(SyncOutcome { winner, remote_found, upload })
    }

    /// Convert the legacy single-file snapshot at `legacy_path` to the
    /// multi-file layout, then delete it.
    ///
    /// The legacy format carries no play counts; local ones are uploaded.
    pub async fn migrate_legacy(&self, legacy_path: &str) -> AppResult<MigrationOutcome> {
        let raw = self
            .remote
            .read_text(legacy_path)
            .await
            .map_err(|e| AppError::Sync(SyncError::read(legacy_path, e)))?;
        let Some(raw) = raw else {
            info!("No legacy data at {}", legacy_path);
            return Ok(MigrationOutcome::NothingToMigrate);
        };

        let snapshot = match parse_snapshot(&raw) {
            Ok(snapshot) => snapshot,
            Err(reason) => {
                warn!("Legacy data at {} not migrated: {}", legacy_path, reason);
                return Ok(MigrationOutcome::Unsupported { reason });
            },
        };

        let play_counts = load_play_counts(self.local.as_ref())?;
        let upload = upload_snapshot(self.remote.as_ref(), &snapshot, &play_counts)
            .await
            .into_result()?;

        if let Err(e) = self.remote.delete(legacy_path).await {
            warn!("Failed to delete legacy file {}: {}", legacy_path, e);
        }
        info!("Migrated legacy data from {}", legacy_path);
        Ok(MigrationOutcome::Migrated { upload })
    }

    /// [`Self::migrate_legacy`] at the default legacy location.
    pub async fn migrate_default_legacy(&self) -> AppResult<MigrationOutcome> {
        self.migrate_legacy(LEGACY_DATA_PATH).await
    }
}
