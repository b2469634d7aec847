//! Server daemon configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default mount point of the forwarding proxy.
pub const DEFAULT_PROXY_MOUNT: &str = "/api/webdav-proxy";

/// Configuration of the headless server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ServerConfig {
    /// Allow LAN access (bind to 0.0.0.0)
    #[serde(default)]
    pub allow_lan_access: bool,
    /// Port to listen on
    #[validate(range(min = 1024_u16, max = 65535_u16))]
    pub port: u16,
    /// Path prefix the forwarding proxy is mounted under
    #[validate(length(min = 2_u64))]
    #[serde(default = "default_proxy_mount")]
    pub proxy_mount: String,
    /// Upstream request timeout in seconds
    #[validate(range(min = 1_u64, max = 3600_u64))]
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout: u64,
    /// Largest request body the proxy buffers, in bytes
    #[validate(range(min = 1024_usize))]
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
    /// Periodic sync interval in seconds (only when settings enable auto sync)
    #[validate(range(min = 30_u64))]
    #[serde(default = "default_auto_sync_interval")]
    pub auto_sync_interval: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allow_lan_access: false,
            port: 8046,
            proxy_mount: default_proxy_mount(),
            upstream_timeout: default_upstream_timeout(),
            body_limit: default_body_limit(),
            auto_sync_interval: default_auto_sync_interval(),
        }
    }
}

impl ServerConfig {
    /// Get the bind address based on LAN access setting.
    pub fn get_bind_address(&self) -> String {
        if self.allow_lan_access {
            "0.0.0.0".to_string()
        } else {
            "127.0.0.1".to_string()
        }
    }

    /// Get the full bind socket address.
    pub fn get_socket_addr(&self) -> String {
        format!("{}:{}", self.get_bind_address(), self.port)
    }

    /// Mount point without a trailing slash, always starting with `/`.
    pub fn normalized_mount(&self) -> String {
        let trimmed = self.proxy_mount.trim().trim_end_matches('/');
        if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}

fn default_proxy_mount() -> String {
    DEFAULT_PROXY_MOUNT.to_string()
}

pub const fn default_upstream_timeout() -> u64 {
    60
}

const fn default_body_limit() -> usize {
    100 * 1024 * 1024
}

const fn default_auto_sync_interval() -> u64 {
    300
}
