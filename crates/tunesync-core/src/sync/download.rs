//! Download: read every entity file independently and merge into defaults.

use serde::Serialize;
use tracing::{debug, info};
use tunesync_types::models::sync::{SyncEntity, METADATA_PATH};
use tunesync_types::{AppSnapshot, PlayCounts, SyncError, SyncMetadata};

use super::entity_file::{apply_payload, decode_entity_file};
use super::store::RemoteStore;

/// Remote state as reconstructed by one download.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteData {
    pub snapshot: AppSnapshot,
    pub play_counts: PlayCounts,
    /// Entities that fell back to their defaults
    pub missing: Vec<SyncEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SyncMetadata>,
}

impl RemoteData {
    /// Nothing usable was found remotely.
    pub fn is_empty(&self) -> bool {
        self.missing.len() == SyncEntity::ALL.len()
    }
}

async fn read_entity(
    remote: &dyn RemoteStore,
    entity: SyncEntity,
    snapshot: &mut AppSnapshot,
    play_counts: &mut PlayCounts,
) -> Result<Option<i64>, SyncError> {
    let body = remote
        .read_text(entity.file_path())
        .await
        .map_err(|e| SyncError::entity_missing(entity.key(), e))?
        .ok_or_else(|| SyncError::entity_missing(entity.key(), "not found"))?;
    let file = decode_entity_file(entity, &body)?;
    apply_payload(entity, file.payload, snapshot, play_counts)?;
    Ok(file.updated_at)
}

async fn read_metadata(remote: &dyn RemoteStore) -> Option<SyncMetadata> {
    let body = remote.read_text(METADATA_PATH).await.ok()??;
    serde_json::from_str::<SyncMetadata>(&body)
        .inspect_err(|e| debug!("Ignoring unreadable {}: {}", METADATA_PATH, e))
        .ok()
}

/// Rebuild the remote snapshot one entity at a time.
///
/// A missing, unparseable or wrong-version file leaves its entity at the
/// default and never aborts the download. The snapshot's `updatedAt` is the
/// newest entity timestamp found, or now when nothing was found.
pub async fn download_snapshot(remote: &dyn RemoteStore) -> RemoteData {
    let metadata = read_metadata(remote).await;

    let mut snapshot = AppSnapshot::new();
    let mut play_counts = PlayCounts::new();
    let mut missing = Vec::new();
    let mut newest: Option<i64> = None;

    for entity in SyncEntity::ALL {
        match read_entity(remote, entity, &mut snapshot, &mut play_counts).await {
            Ok(updated_at) => newest = newest.max(updated_at),
            Err(e) => {
                debug!("{}", e);
                missing.push(entity);
            },
        }
    }

    if let Some(ts) = newest.or_else(|| metadata.as_ref().map(|m| m.last_sync)) {
        snapshot.updated_at = ts;
    }

    info!(
        "Downloaded {} of {} entities{}",
        SyncEntity::ALL.len() - missing.len(),
        SyncEntity::ALL.len(),
        if metadata.is_some() { "" } else { " (no metadata)" }
    );

    RemoteData { snapshot, play_counts, missing, metadata }
}
