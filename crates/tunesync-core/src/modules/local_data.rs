//! The locally persisted snapshot and play counts.

use serde_json::{Map, Value};
use tracing::{debug, warn};
use tunesync_types::models::sync::SCHEMA_VERSION;
use tunesync_types::{AppSnapshot, PlayCounts};

use super::local_store::KeyValueStore;
use crate::error::{AppError, AppResult};

pub const LOCAL_DATA_KEY: &str = "music_app_data_v1";
pub const PLAY_COUNTS_KEY: &str = "music_app_play_counts_v1";

/// Lay the top-level fields of a stored snapshot over a fresh default.
fn overlay_defaults(stored: Map<String, Value>) -> serde_json::Result<AppSnapshot> {
    let mut merged = match serde_json::to_value(AppSnapshot::new())? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merged.extend(stored);
    serde_json::from_value(Value::Object(merged))
}

/// Parse a stored or exported snapshot, accepting version 1 only.
pub fn parse_snapshot(raw: &str) -> Result<AppSnapshot, String> {
    let stored: Map<String, Value> = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    match stored.get("version").and_then(Value::as_u64) {
        Some(v) if v == u64::from(SCHEMA_VERSION) => {
            overlay_defaults(stored).map_err(|e| e.to_string())
        },
        other => Err(format!("unsupported data version {:?}", other)),
    }
}

/// Load the local snapshot. Missing, unparseable or foreign-version data
/// yields a fresh default.
pub fn load_local_data(store: &dyn KeyValueStore) -> AppResult<AppSnapshot> {
    let Some(raw) = store.get(LOCAL_DATA_KEY)? else {
        debug!("No local data, starting from defaults");
        return Ok(AppSnapshot::new());
    };
    Ok(parse_snapshot(&raw).unwrap_or_else(|e| {
        warn!("Discarding local data: {}", e);
        AppSnapshot::new()
    }))
}

/// Write the snapshot exactly as given.
pub fn write_local_data(store: &dyn KeyValueStore, snapshot: &AppSnapshot) -> AppResult<()> {
    store.set(LOCAL_DATA_KEY, &serde_json::to_string(snapshot)?)
}

/// Stamp `updatedAt` with the current time and persist.
pub fn save_local_data(store: &dyn KeyValueStore, snapshot: &mut AppSnapshot) -> AppResult<()> {
    snapshot.touch();
    write_local_data(store, snapshot)
}

/// Pretty JSON of the current local snapshot.
pub fn export_local_data(store: &dyn KeyValueStore) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(&load_local_data(store)?)?)
}

/// Replace local data with an exported snapshot. Only version 1 is accepted.
pub fn import_local_data(store: &dyn KeyValueStore, json: &str) -> AppResult<AppSnapshot> {
    let mut snapshot = parse_snapshot(json).map_err(AppError::Storage)?;
    save_local_data(store, &mut snapshot)?;
    Ok(snapshot)
}

pub fn load_play_counts(store: &dyn KeyValueStore) -> AppResult<PlayCounts> {
    let Some(raw) = store.get(PLAY_COUNTS_KEY)? else {
        return Ok(PlayCounts::new());
    };
    Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("Discarding local play counts: {}", e);
        PlayCounts::new()
    }))
}

pub fn save_play_counts(store: &dyn KeyValueStore, play_counts: &PlayCounts) -> AppResult<()> {
    store.set(PLAY_COUNTS_KEY, &serde_json::to_string(play_counts)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::modules::local_store::MemoryKeyValueStore;
    use serde_json::json;

    #[test]
    fn test_missing_data_is_default() {
        let store = MemoryKeyValueStore::new();
        let snapshot = load_local_data(&store).unwrap();
        assert!(snapshot.is_supported_version());
        assert!(snapshot.playlists.is_empty());
    }

    #[test]
    fn test_wrong_version_and_garbage_load_as_default() {
        let store = MemoryKeyValueStore::new();
        let v2 = json!({"version": 2, "favorites": {"songs": ["x"]}});
        store.set(LOCAL_DATA_KEY, &v2.to_string()).unwrap();
        assert!(load_local_data(&store).unwrap().favorites.songs.is_empty());

        store.set(LOCAL_DATA_KEY, "not json").unwrap();
        assert!(load_local_data(&store).unwrap().favorites.songs.is_empty());
    }

    #[test]
    fn test_partial_data_overlays_defaults() {
        let store = MemoryKeyValueStore::new();
        store
            .set(
                LOCAL_DATA_KEY,
                &json!({"version": 1, "updatedAt": 5, "favorites": {"songs": ["a"]}}).to_string(),
            )
            .unwrap();
        let snapshot = load_local_data(&store).unwrap();
        assert_eq!(snapshot.updated_at, 5);
        assert_eq!(snapshot.favorites.songs, vec!["a"]);
        assert!(snapshot.history.songs.is_empty());
    }

    #[test]
    fn test_save_stamps_time() {
        let store = MemoryKeyValueStore::new();
        let mut snapshot = AppSnapshot::with_timestamp(1);
        save_local_data(&store, &mut snapshot).unwrap();
        assert!(snapshot.updated_at > 1);
        assert_eq!(load_local_data(&store).unwrap().updated_at, snapshot.updated_at);
    }

    #[test]
    fn test_import_rejects_v2_and_accepts_v1() {
        let store = MemoryKeyValueStore::new();
        let v2 = json!({"version": 2}).to_string();
        assert!(matches!(import_local_data(&store, &v2), Err(AppError::Storage(_))));
        assert!(store.get(LOCAL_DATA_KEY).unwrap().is_none());

        let v1 = json!({"version": 1, "playlists": [
            {"id": "p1", "name": "Road", "trackIds": ["t1"], "createdAt": 1, "updatedAt": 2}
        ]})
        .to_string();
        let imported = import_local_data(&store, &v1).unwrap();
        assert_eq!(imported.playlists.len(), 1);

        let exported: Value = serde_json::from_str(&export_local_data(&store).unwrap()).unwrap();
        assert_eq!(exported["playlists"][0]["name"], "Road");
    }

    #[test]
    fn test_play_counts_round_trip() {
        let store = MemoryKeyValueStore::new();
        assert!(load_play_counts(&store).unwrap().is_empty());
        let counts = PlayCounts::from([("t1".to_string(), 4)]);
        save_play_counts(&store, &counts).unwrap();
        assert_eq!(load_play_counts(&store).unwrap(), counts);
    }
}
