use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use tunesync_core::modules::config::{load_config_from, save_config_to};
use tunesync_core::modules::local_data::{load_local_data, save_local_data};
use tunesync_core::modules::local_store::KeyValueStore;
use tunesync_types::{ServerConfig, WebDavConfig};

use crate::sync_commands::parse_strategy;

pub fn show_config(data_dir: &Path, local: &dyn KeyValueStore, json: bool) -> Result<()> {
    let server = load_config_from(data_dir).map_err(|e| anyhow::anyhow!(e))?;
    let mut webdav = load_local_data(local)?.settings.webdav;
    webdav.password = mask_key(&webdav.password);

    if json {
        let value = serde_json::json!({ "server": server, "webdav": webdav });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Server Configuration:".cyan().bold());
    println!("  Listen: {}", server.get_socket_addr());
    println!("  Proxy Mount: {}", server.normalized_mount());
    println!("  Upstream Timeout: {}s", server.upstream_timeout);
    println!("  Body Limit: {} bytes", server.body_limit);
    println!("  Auto Sync Interval: {}s", server.auto_sync_interval);

    println!("{}", "WebDAV Sync:".cyan().bold());
    if webdav.is_configured() {
        println!("  URL: {}", webdav.url);
    } else {
        println!("  URL: {}", "(not configured)".dimmed());
    }
    println!("  Username: {}", webdav.username);
    println!("  Password: {}", webdav.password);
    println!("  Legacy Path: {}", webdav.remote_path);
    println!("  Timeout: {}ms", webdav.timeout_ms);
    println!("  Auto Sync: {}", webdav.auto_sync);
    println!("  Conflict Strategy: {}", webdav.effective_strategy());
    if let Some(proxy) = &webdav.proxy_url {
        println!("  Proxy: {}", proxy);
    }
    Ok(())
}

pub fn set_config_value(
    data_dir: &Path,
    local: &dyn KeyValueStore,
    key: &str,
    value: &str,
) -> Result<()> {
    match key.split_once('.') {
        Some(("server", field)) => {
            let mut config = load_config_from(data_dir).map_err(|e| anyhow::anyhow!(e))?;
            apply_server_value(&mut config, field, value)?;
            save_config_to(data_dir, &config).map_err(|e| anyhow::anyhow!(e))?;
        },
        Some(("webdav", field)) => {
            let mut snapshot = load_local_data(local)?;
            apply_webdav_value(&mut snapshot.settings.webdav, field, value)?;
            save_local_data(local, &mut snapshot)?;
        },
        _ => anyhow::bail!("Unknown config key: {}", key),
    }

    let shown = if key == "webdav.password" { mask_key(value) } else { value.to_string() };
    println!("{} Config updated: {} = {}", "✓".green(), key, shown);
    Ok(())
}

fn apply_server_value(config: &mut ServerConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "port" => config.port = parse_value(value, "port number")?,
        "allow_lan_access" => config.allow_lan_access = parse_value(value, "boolean")?,
        "proxy_mount" => config.proxy_mount = value.to_string(),
        "upstream_timeout" => config.upstream_timeout = parse_value(value, "number of seconds")?,
        "body_limit" => config.body_limit = parse_value(value, "number of bytes")?,
        "auto_sync_interval" => {
            config.auto_sync_interval = parse_value(value, "number of seconds")?;
        },
        _ => anyhow::bail!("Unknown config key: server.{}", field),
    }
    Ok(())
}

fn apply_webdav_value(webdav: &mut WebDavConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "url" => webdav.url = value.trim().to_string(),
        "username" => webdav.username = value.to_string(),
        "password" => webdav.password = value.to_string(),
        "remote_path" => webdav.remote_path = value.to_string(),
        "timeout_ms" => webdav.timeout_ms = parse_value(value, "number of milliseconds")?,
        "auto_sync" => webdav.auto_sync = parse_value(value, "boolean")?,
        "conflict_strategy" => {
            webdav.conflict_strategy = match value {
                "" | "none" => None,
                other => Some(parse_strategy(other)?),
            };
        },
        "proxy_url" => {
            webdav.proxy_url = Some(value.trim().to_string()).filter(|p| !p.is_empty());
        },
        _ => anyhow::bail!("Unknown config key: webdav.{}", field),
    }
    Ok(())
}

fn parse_value<T: std::str::FromStr>(value: &str, kind: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| anyhow::anyhow!("Invalid {}: {}", kind, value))
}

const SECRET_MASK: &str = "********";

/// Fixed-width mask; only tells whether a secret is set.
fn mask_key(key: &str) -> String {
    if key.is_empty() {
        String::new()
    } else {
        SECRET_MASK.to_string()
    }
}
