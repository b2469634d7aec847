use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{SyncEntity, SCHEMA_VERSION};

/// Summary of one entity file as it was written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub updated_at: i64,
    /// Byte length of the file body
    pub size: u64,
    /// Lowercase hex SHA-256 of the file body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Per-session record written after all entity files.
///
/// Informational only: absence or staleness never blocks a download.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetadata {
    pub version: u32,
    pub last_sync: i64,
    /// Keyed by [`SyncEntity::key`]
    pub files: BTreeMap<String, FileInfo>,
}

impl SyncMetadata {
    pub fn new(last_sync: i64) -> Self {
        Self { version: SCHEMA_VERSION, last_sync, files: BTreeMap::new() }
    }

    pub fn record(&mut self, entity: SyncEntity, info: FileInfo) {
        self.files.insert(entity.key().to_string(), info);
    }

    pub fn file(&self, entity: SyncEntity) -> Option<&FileInfo> {
        self.files.get(entity.key())
    }

    /// True when every entity has an entry.
    pub fn is_complete(&self) -> bool {
        SyncEntity::ALL.iter().all(|e| self.files.contains_key(e.key()))
    }
}
