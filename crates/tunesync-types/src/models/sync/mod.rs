//! Multi-File Sync Layout
//!
//! Application state is partitioned into five entities, each stored in its
//! own remote file, plus one informational metadata descriptor.
//!
//! # Layout
//!
//! ```text
//! /music-app/settings.json     {version, updatedAt, settings}
//! /music-app/favorites.json    {version, updatedAt, favorites}
//! /music-app/history.json      {version, updatedAt, history}
//! /music-app/playlists.json    {version, updatedAt, playlists}
//! /music-app/playCounts.json   {version, updatedAt, playCounts}
//! /music-app/metadata.json     {version, lastSync, files}
//! ```
//!
//! No entity's presence or freshness implies another's. A file with a
//! version other than [`SCHEMA_VERSION`] is treated as absent.

mod metadata;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests;

pub use metadata::{FileInfo, SyncMetadata};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version tag embedded in every entity file and the metadata descriptor.
pub const SCHEMA_VERSION: u32 = 1;

/// Remote directory holding all sync files.
pub const REMOTE_DIR: &str = "/music-app/";

/// Remote path of the metadata descriptor.
pub const METADATA_PATH: &str = "/music-app/metadata.json";

/// Remote path of the deprecated single-file snapshot.
pub const LEGACY_DATA_PATH: &str = "/music-app/data.json";

/// One independently synchronized slice of application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncEntity {
    Settings,
    Favorites,
    History,
    Playlists,
    PlayCounts,
}

impl SyncEntity {
    /// All entities in upload order.
    pub const ALL: [SyncEntity; 5] = [
        SyncEntity::Settings,
        SyncEntity::Favorites,
        SyncEntity::History,
        SyncEntity::Playlists,
        SyncEntity::PlayCounts,
    ];

    /// JSON key of the payload inside the entity file and in metadata `files`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Favorites => "favorites",
            Self::History => "history",
            Self::Playlists => "playlists",
            Self::PlayCounts => "playCounts",
        }
    }

    /// Stable remote file path.
    pub fn file_path(self) -> &'static str {
        match self {
            Self::Settings => "/music-app/settings.json",
            Self::Favorites => "/music-app/favorites.json",
            Self::History => "/music-app/history.json",
            Self::Playlists => "/music-app/playlists.json",
            Self::PlayCounts => "/music-app/playCounts.json",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.key() == key)
    }
}

impl fmt::Display for SyncEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Current Unix time in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
