use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use tunesync_core::modules::local_data::{export_local_data, import_local_data};
use tunesync_core::modules::local_store::KeyValueStore;

pub fn export_data(local: &dyn KeyValueStore, output: Option<&Path>) -> Result<()> {
    let json = export_local_data(local)?;
    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} Exported local data to {}", "✓".green(), path.display());
        },
        None => println!("{}", json),
    }
    Ok(())
}

pub fn import_data(local: &dyn KeyValueStore, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let snapshot = import_local_data(local, &content)?;

    println!("{} Imported local data from {}", "✓".green(), file.display());
    println!(
        "  Favorites: {} songs, {} playlists, {} albums",
        snapshot.favorites.songs.len(),
        snapshot.favorites.playlists.len(),
        snapshot.favorites.albums.len()
    );
    println!("  History: {} entries", snapshot.history.songs.len());
    println!("  Playlists: {}", snapshot.playlists.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tunesync_core::modules::local_data::{load_local_data, save_local_data};
    use tunesync_core::modules::local_store::MemoryKeyValueStore;
    use tunesync_types::AppSnapshot;

    #[test]
    fn test_export_then_import_into_fresh_store() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("backup.json");

        let source = MemoryKeyValueStore::new();
        let mut snapshot = AppSnapshot::new();
        snapshot.favorites.songs.push("t1".to_string());
        save_local_data(&source, &mut snapshot).unwrap();
        export_data(&source, Some(&file)).unwrap();

        let target = MemoryKeyValueStore::new();
        import_data(&target, &file).unwrap();
        assert_eq!(load_local_data(&target).unwrap().favorites.songs, vec!["t1"]);
    }

    #[test]
    fn test_import_rejects_other_versions() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("v2.json");
        fs::write(&file, r#"{"version":2,"updatedAt":1}"#).unwrap();

        let target = MemoryKeyValueStore::new();
        assert!(import_data(&target, &file).is_err());
    }

    #[test]
    fn test_import_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let target = MemoryKeyValueStore::new();
        assert!(import_data(&target, &tmp.path().join("nope.json")).is_err());
    }
}
