//! Upload: every entity file, then the metadata descriptor.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};
use tunesync_types::models::sync::{SyncEntity, METADATA_PATH, REMOTE_DIR};
use tunesync_types::{current_timestamp_ms, AppSnapshot, PlayCounts, SyncError, SyncMetadata};

use super::entity_file::{encode_entity_file, entity_payload, file_info};
use super::store::RemoteStore;

/// Per-entity upload progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityState {
    Pending,
    Written,
    Failed,
}

/// Outcome of one upload session.
///
/// Files written before a failure stay written; the report says which.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    /// Timestamp shared by every file of the session
    pub updated_at: i64,
    pub entities: BTreeMap<SyncEntity, EntityState>,
    pub metadata_written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SyncError>,
}

impl UploadReport {
    fn new(updated_at: i64) -> Self {
        Self {
            updated_at,
            entities: SyncEntity::ALL.iter().map(|e| (*e, EntityState::Pending)).collect(),
            metadata_written: false,
            error: None,
        }
    }

    pub fn state(&self, entity: SyncEntity) -> EntityState {
        self.entities.get(&entity).copied().unwrap_or(EntityState::Pending)
    }

    pub fn written(&self) -> Vec<SyncEntity> {
        self.entities
            .iter()
            .filter(|(_, s)| **s == EntityState::Written)
            .map(|(e, _)| *e)
            .collect()
    }

    /// All entities and the metadata descriptor were written.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
            && self.metadata_written
            && self.entities.values().all(|s| *s == EntityState::Written)
    }

    /// `Err` with the failing file when the upload was aborted.
    pub fn into_result(self) -> Result<Self, SyncError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// Write every entity file, then the metadata descriptor.
///
/// Stops at the first failed write. No rollback.
pub async fn upload_snapshot(
    remote: &dyn RemoteStore,
    snapshot: &AppSnapshot,
    play_counts: &PlayCounts,
) -> UploadReport {
    let updated_at = current_timestamp_ms();
    let mut report = UploadReport::new(updated_at);
    let mut metadata = SyncMetadata::new(updated_at);

    if let Err(e) = remote.create_collection(REMOTE_DIR).await {
        // Non-fatal: a missing collection shows up as a failed PUT.
        debug!("Ensuring {} failed: {}", REMOTE_DIR, e);
    }

    for entity in SyncEntity::ALL {
        let path = entity.file_path();
        let written = match entity_payload(entity, snapshot, play_counts)
            .and_then(|payload| encode_entity_file(entity, updated_at, payload))
        {
            Ok(body) => {
                let info = file_info(&body, updated_at);
                remote.write_text(path, body).await.map(|()| info).map_err(|e| e.to_string())
            },
            Err(e) => Err(e.to_string()),
        };

        match written {
            Ok(info) => {
                report.entities.insert(entity, EntityState::Written);
                metadata.record(entity, info);
            },
            Err(message) => {
                warn!("Upload aborted at {}: {}", path, message);
                report.entities.insert(entity, EntityState::Failed);
                report.error = Some(SyncError::write(path, message));
                return report;
            },
        }
    }

    let metadata_write = match serde_json::to_string_pretty(&metadata) {
        Ok(body) => remote.write_text(METADATA_PATH, body).await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    match metadata_write {
        Ok(()) => {
            report.metadata_written = true;
            info!("Uploaded {} entity files and metadata", SyncEntity::ALL.len());
        },
        Err(message) => {
            warn!("Upload aborted at {}: {}", METADATA_PATH, message);
            report.error = Some(SyncError::write(METADATA_PATH, message));
        },
    }
    report
}
