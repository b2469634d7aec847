//! Synchronization errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during upload, download and migration.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum SyncError {
    /// A single entity or metadata write failed; the upload was aborted
    /// without rolling back files already written
    #[error("Failed to write {path}: {message}")]
    Write {
        /// Remote path of the file that failed
        path: String,
        /// Description of the failure
        message: String,
    },

    /// A remote read failed outside of per-entity download recovery
    #[error("Failed to read {path}: {message}")]
    Read {
        /// Remote path of the file that failed
        path: String,
        /// Description of the failure
        message: String,
    },

    /// A single entity file is absent, unparseable or carries the wrong
    /// version. Recovered locally during download.
    #[error("Entity {entity} unavailable: {reason}")]
    EntityMissing {
        /// Entity key (e.g. `history`)
        entity: String,
        /// Why the file could not be used
        reason: String,
    },

    /// Download orchestration itself failed; no sync data is available
    #[error("Sync unavailable: {message}")]
    TotalFailure {
        /// Description of the failure
        message: String,
    },
}

impl SyncError {
    pub fn write(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Write { path: path.into(), message: message.to_string() }
    }

    pub fn read(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Read { path: path.into(), message: message.to_string() }
    }

    pub fn entity_missing(entity: impl Into<String>, reason: impl ToString) -> Self {
        Self::EntityMissing { entity: entity.into(), reason: reason.to_string() }
    }

    pub fn total(message: impl ToString) -> Self {
        Self::TotalFailure { message: message.to_string() }
    }

    /// Entity-level faults are recovered during download and never surfaced.
    pub fn is_locally_recoverable(&self) -> bool {
        matches!(self, Self::EntityMissing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_names_path() {
        let err = SyncError::write("/music-app/playlists.json", "HTTP 423 Locked");
        let msg = err.to_string();
        assert!(msg.contains("/music-app/playlists.json"));
        assert!(msg.contains("423"));
        assert!(!err.is_locally_recoverable());
    }

    #[test]
    fn test_entity_missing_is_recoverable() {
        assert!(SyncError::entity_missing("history", "not found").is_locally_recoverable());
        assert!(!SyncError::total("bad url").is_locally_recoverable());
    }
}
