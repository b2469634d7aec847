use super::*;

#[test]
fn test_entity_paths_are_distinct_and_under_remote_dir() {
    let mut paths: Vec<&str> = SyncEntity::ALL.iter().map(|e| e.file_path()).collect();
    paths.sort_unstable();
    paths.dedup();
    assert_eq!(paths.len(), 5);
    for p in paths {
        assert!(p.starts_with(REMOTE_DIR));
        assert_ne!(p, METADATA_PATH);
        assert_ne!(p, LEGACY_DATA_PATH);
    }
}

#[test]
fn test_play_counts_key_is_camel_case() {
    assert_eq!(SyncEntity::PlayCounts.key(), "playCounts");
    assert_eq!(SyncEntity::PlayCounts.file_path(), "/music-app/playCounts.json");
    assert_eq!(serde_json::to_string(&SyncEntity::PlayCounts).unwrap(), "\"playCounts\"");
}

#[test]
fn test_from_key() {
    for e in SyncEntity::ALL {
        assert_eq!(SyncEntity::from_key(e.key()), Some(e));
    }
    assert_eq!(SyncEntity::from_key("metadata"), None);
}

#[test]
fn test_metadata_wire_shape() {
    let mut meta = SyncMetadata::new(1_700_000_000_000);
    meta.record(
        SyncEntity::Favorites,
        FileInfo { updated_at: 1_700_000_000_000, size: 120, checksum: None },
    );

    let v = serde_json::to_value(&meta).unwrap();
    assert_eq!(v["version"], 1);
    assert_eq!(v["lastSync"], 1_700_000_000_000_i64);
    assert_eq!(v["files"]["favorites"]["size"], 120);
    assert!(v["files"]["favorites"].get("checksum").is_none());
    assert!(!meta.is_complete());
}

#[test]
fn test_metadata_complete_after_all_entities() {
    let mut meta = SyncMetadata::new(5);
    for e in SyncEntity::ALL {
        meta.record(e, FileInfo { updated_at: 5, size: 1, checksum: Some("ab".to_string()) });
    }
    assert!(meta.is_complete());
    assert_eq!(meta.file(SyncEntity::History).unwrap().checksum.as_deref(), Some("ab"));
}
