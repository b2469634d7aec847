use std::fs;
use std::path::Path;

use tunesync_types::ServerConfig;
use validator::Validate;

pub const CONFIG_FILE: &str = "server_config.json";

/// Load the server configuration from `data_dir`, defaults when absent.
pub fn load_config_from(data_dir: &Path) -> Result<ServerConfig, String> {
    let config_path = data_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(ServerConfig::default());
    }

    let content =
        fs::read_to_string(&config_path).map_err(|e| format!("Failed to read config: {}", e))?;
    let config: ServerConfig =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))?;
    config.validate().map_err(|e| format!("Invalid config: {}", e))?;
    Ok(config)
}

/// Validate and atomically write the server configuration to `data_dir`.
pub fn save_config_to(data_dir: &Path, config: &ServerConfig) -> Result<(), String> {
    config.validate().map_err(|e| format!("Invalid config: {}", e))?;

    let config_path = data_dir.join(CONFIG_FILE);
    let temp_path = data_dir.join(format!("{}.tmp", CONFIG_FILE));
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    fs::write(&temp_path, content).map_err(|e| format!("Failed to write temp config: {}", e))?;
    fs::rename(&temp_path, &config_path).map_err(|e| format!("Failed to save config: {}", e))
}

/// Load, modify and save in one step.
pub fn update_config_in<F>(data_dir: &Path, updater: F) -> Result<ServerConfig, String>
where
    F: FnOnce(&mut ServerConfig),
{
    let mut config = load_config_from(data_dir)?;
    updater(&mut config);
    save_config_to(data_dir, &config)?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(load_config_from(tmp.path()).unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = ServerConfig { port: 9100, allow_lan_access: true, ..Default::default() };
        save_config_to(tmp.path(), &cfg).unwrap();

        assert_eq!(load_config_from(tmp.path()).unwrap(), cfg);
        assert!(!tmp.path().join(format!("{}.tmp", CONFIG_FILE)).exists());
    }

    #[test]
    fn test_invalid_config_not_saved() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = ServerConfig { port: 22, ..Default::default() };
        assert!(save_config_to(tmp.path(), &cfg).is_err());
        assert!(!tmp.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_update_config() {
        let tmp = tempfile::tempdir().unwrap();
        let updated = update_config_in(tmp.path(), |c| c.upstream_timeout = 15).unwrap();
        assert_eq!(updated.upstream_timeout, 15);
        assert_eq!(load_config_from(tmp.path()).unwrap().upstream_timeout, 15);
    }

    #[test]
    fn test_garbage_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "{not json").unwrap();
        assert!(load_config_from(tmp.path()).is_err());
    }
}
