//! Config-driven entry points that build a fresh WebDAV client per call.

use tracing::{error, warn};
use tunesync_types::models::sync::REMOTE_DIR;
use tunesync_types::{SyncError, WebDavConfig};

use super::download::{download_snapshot, RemoteData};
use super::store::RemoteStore;
use super::webdav::WebDavClient;

/// True when the server answers a PROPFIND on its root.
pub async fn test_connection(config: &WebDavConfig) -> bool {
    let client = match WebDavClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            warn!("WebDAV connection test skipped: {}", e);
            return false;
        },
    };
    match client.check_root().await {
        Ok(()) => true,
        Err(e) => {
            warn!("WebDAV connection test failed: {}", e);
            false
        },
    }
}

/// File names directly under the sync directory. Empty on any error.
pub async fn list_sync_files(config: &WebDavConfig) -> Vec<String> {
    let Ok(client) = WebDavClient::new(config) else {
        return Vec::new();
    };
    match client.list(REMOTE_DIR).await {
        Ok(paths) => paths
            .iter()
            .filter_map(|p| p.strip_prefix(REMOTE_DIR))
            .map(|name| name.trim_end_matches('/').to_string())
            .filter(|name| !name.is_empty())
            .collect(),
        Err(e) => {
            warn!("Listing {} failed: {}", REMOTE_DIR, e);
            Vec::new()
        },
    }
}

/// Multi-file download. `None` only when the client cannot be built.
pub async fn download_with_config(config: &WebDavConfig) -> Option<RemoteData> {
    match WebDavClient::new(config) {
        Ok(client) => Some(download_snapshot(&client).await),
        Err(e) => {
            error!("{}", SyncError::total(e));
            None
        },
    }
}
