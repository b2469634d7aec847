//! Remote store connection settings.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::enums::ConflictStrategy;
use crate::models::sync::LEGACY_DATA_PATH;

/// WebDAV connection and sync behaviour, stored inside the settings entity.
///
/// Credentials are passed through unchanged to the remote store. `Debug`
/// masks the password so the struct can appear in logs.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct WebDavConfig {
    /// Base URL of the WebDAV server (e.g. `https://dav.example.com/remote.php/dav`)
    pub url: String,
    pub username: String,
    pub password: String,
    /// Path of the legacy single-file snapshot
    pub remote_path: String,
    /// Upper bound for every remote call
    pub timeout_ms: u64,
    pub auto_sync: bool,
    /// Unset means last-writer-wins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_strategy: Option<ConflictStrategy>,
    /// Forwarding proxy base (e.g. `http://localhost:8046/api/webdav-proxy`).
    /// When set, every remote call is routed through it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

impl Default for WebDavConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            remote_path: LEGACY_DATA_PATH.to_string(),
            timeout_ms: 15_000,
            auto_sync: false,
            conflict_strategy: Some(ConflictStrategy::ServerWins),
            proxy_url: None,
        }
    }
}

impl WebDavConfig {
    /// True once a server URL has been entered.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Strategy with the unset case folded into last-writer-wins.
    pub fn effective_strategy(&self) -> ConflictStrategy {
        self.conflict_strategy.unwrap_or(ConflictStrategy::LastWriteWins)
    }
}

impl fmt::Debug for WebDavConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDavConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("remote_path", &self.remote_path)
            .field("timeout_ms", &self.timeout_ms)
            .field("auto_sync", &self.auto_sync)
            .field("conflict_strategy", &self.conflict_strategy)
            .field("proxy_url", &self.proxy_url)
            .finish()
    }
}
