//! Application-level settings (the `settings` sync entity).

use serde::{Deserialize, Serialize};

use super::webdav::WebDavConfig;

/// Track metadata API endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
}

/// Full application settings block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppSettings {
    /// Metadata API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Remote store configuration
    #[serde(default)]
    pub webdav: WebDavConfig,
}
