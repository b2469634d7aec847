use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TUNESYNC_DATA_DIR";

const DATA_DIR: &str = ".tunesync";

/// Create `dir` if needed and return it.
pub fn ensure_dir(dir: &Path) -> Result<PathBuf, String> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| format!("Failed to create data directory: {}", e))?;
    }
    Ok(dir.to_path_buf())
}

/// Get the data directory path.
///
/// `TUNESYNC_DATA_DIR` wins over `~/.tunesync`.
pub fn get_data_dir() -> Result<PathBuf, String> {
    let data_dir = match std::env::var(DATA_DIR_ENV) {
        Ok(custom_dir) if !custom_dir.trim().is_empty() => PathBuf::from(custom_dir),
        _ => dirs::home_dir().ok_or("Cannot get home directory")?.join(DATA_DIR),
    };
    ensure_dir(&data_dir)
}
