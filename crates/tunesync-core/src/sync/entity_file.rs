//! Entity file envelope: `{ "version": 1, "updatedAt": <ms>, "<key>": <payload> }`.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tunesync_types::models::sync::{SyncEntity, SCHEMA_VERSION};
use tunesync_types::{AppSettings, AppSnapshot, FileInfo, PlayCounts, SyncError};

/// Serialized payload of one entity taken from the snapshot and play counts.
pub fn entity_payload(
    entity: SyncEntity,
    snapshot: &AppSnapshot,
    play_counts: &PlayCounts,
) -> serde_json::Result<Value> {
    match entity {
        SyncEntity::Settings => serde_json::to_value(&snapshot.settings),
        SyncEntity::Favorites => serde_json::to_value(&snapshot.favorites),
        SyncEntity::History => serde_json::to_value(&snapshot.history),
        SyncEntity::Playlists => serde_json::to_value(&snapshot.playlists),
        SyncEntity::PlayCounts => serde_json::to_value(play_counts),
    }
}

/// Wrap a payload in the versioned envelope.
pub fn encode_entity_file(
    entity: SyncEntity,
    updated_at: i64,
    payload: Value,
) -> serde_json::Result<String> {
    let mut envelope = Map::new();
    envelope.insert("version".to_string(), Value::from(SCHEMA_VERSION));
    envelope.insert("updatedAt".to_string(), Value::from(updated_at));
    envelope.insert(entity.key().to_string(), payload);
    serde_json::to_string_pretty(&Value::Object(envelope))
}

/// Size and SHA-256 of a file body as written.
pub fn file_info(body: &str, updated_at: i64) -> FileInfo {
    let digest = Sha256::digest(body.as_bytes());
    let checksum = digest.iter().map(|b| format!("{:02x}", b)).collect::<String>();
    FileInfo { updated_at, size: body.len() as u64, checksum: Some(checksum) }
}

/// Decoded entity file.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFile {
    pub updated_at: Option<i64>,
    pub payload: Value,
}

/// Extract the payload of an entity file.
///
/// Unparseable bodies, a version other than the current one and a missing
/// payload key all count as the entity being unavailable.
pub fn decode_entity_file(entity: SyncEntity, body: &str) -> Result<EntityFile, SyncError> {
    let missing = |reason: String| SyncError::entity_missing(entity.key(), reason);

    let mut envelope: Map<String, Value> =
        serde_json::from_str(body).map_err(|e| missing(format!("unparseable: {}", e)))?;

    match envelope.get("version").and_then(Value::as_u64) {
        Some(v) if v == u64::from(SCHEMA_VERSION) => {},
        Some(v) => return Err(missing(format!("unsupported version {}", v))),
        None => return Err(missing("missing version".to_string())),
    }

    let updated_at = envelope.get("updatedAt").and_then(Value::as_i64);
    let payload =
        envelope.remove(entity.key()).ok_or_else(|| missing("missing payload".to_string()))?;
    Ok(EntityFile { updated_at, payload })
}

/// Settings with remote top-level keys laid over the defaults.
pub fn merge_settings(remote: Value) -> serde_json::Result<AppSettings> {
    let mut merged = match serde_json::to_value(AppSettings::default())? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Value::Object(remote) = remote {
        merged.extend(remote);
    }
    serde_json::from_value(Value::Object(merged))
}

/// Apply a decoded payload onto the snapshot or play counts.
pub fn apply_payload(
    entity: SyncEntity,
    payload: Value,
    snapshot: &mut AppSnapshot,
    play_counts: &mut PlayCounts,
) -> Result<(), SyncError> {
    let invalid = |e: serde_json::Error| SyncError::entity_missing(entity.key(), e);
    match entity {
        SyncEntity::Settings => snapshot.settings = merge_settings(payload).map_err(invalid)?,
        SyncEntity::Favorites => {
            snapshot.favorites = serde_json::from_value(payload).map_err(invalid)?;
        },
        SyncEntity::History => snapshot.history = serde_json::from_value(payload).map_err(invalid)?,
        SyncEntity::Playlists => {
            snapshot.playlists = serde_json::from_value(payload).map_err(invalid)?;
        },
        SyncEntity::PlayCounts => *play_counts = serde_json::from_value(payload).map_err(invalid)?,
    }
    Ok(())
}
