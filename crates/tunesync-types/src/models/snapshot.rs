//! The application snapshot: everything that gets synchronized.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::config::AppSettings;
use super::sync::{current_timestamp_ms, SCHEMA_VERSION};

/// Play count per track id. Ordered so serialized output is stable.
pub type PlayCounts = BTreeMap<String, u64>;

/// Favorite track, playlist and album ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Favorites {
    #[serde(default)]
    pub songs: Vec<String>,
    #[serde(default)]
    pub playlists: Vec<String>,
    #[serde(default)]
    pub albums: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub played_at: i64,
}

/// Playback history, most recent first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct History {
    #[serde(default)]
    pub songs: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub track_ids: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Full in-memory aggregate of the synchronized state.
///
/// This is the unit the conflict resolver compares. Play counts are kept
/// beside it and travel with whichever snapshot wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSnapshot {
    pub version: u32,
    /// Unix timestamp in milliseconds of the last local modification
    pub updated_at: i64,
    pub settings: AppSettings,
    pub favorites: Favorites,
    pub history: History,
    pub playlists: Vec<Playlist>,
}

impl AppSnapshot {
    /// Fresh default snapshot stamped with the current time.
    pub fn new() -> Self {
        Self::with_timestamp(current_timestamp_ms())
    }

    pub fn with_timestamp(updated_at: i64) -> Self {
        Self {
            version: SCHEMA_VERSION,
            updated_at,
            settings: AppSettings::default(),
            favorites: Favorites::default(),
            history: History::default(),
            playlists: Vec::new(),
        }
    }

    pub fn is_supported_version(&self) -> bool {
        self.version == SCHEMA_VERSION
    }

    /// Stamp `updated_at` with the current time, never moving it backwards.
    pub fn touch(&mut self) {
        self.updated_at = current_timestamp_ms().max(self.updated_at);
    }
}

impl Default for AppSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let snap: AppSnapshot = serde_json::from_value(serde_json::json!({
            "version": 1,
            "updatedAt": 42,
            "favorites": { "songs": ["t1"] }
        }))
        .unwrap();
        assert_eq!(snap.updated_at, 42);
        assert_eq!(snap.favorites.songs, vec!["t1".to_string()]);
        assert!(snap.favorites.albums.is_empty());
        assert!(snap.playlists.is_empty());
        assert_eq!(snap.settings.webdav.timeout_ms, 15_000);
    }

    #[test]
    fn test_playlist_wire_shape() {
        let p = Playlist {
            id: "p1".to_string(),
            name: "Road trip".to_string(),
            track_ids: vec!["a".to_string()],
            created_at: 1,
            updated_at: 2,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["trackIds"][0], "a");
        assert_eq!(v["createdAt"], 1);
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut snap = AppSnapshot::with_timestamp(i64::MAX - 1);
        snap.touch();
        assert_eq!(snap.updated_at, i64::MAX - 1);
    }
}
