//! Unified error types for TuneSync Core.

use serde::Serialize;
use thiserror::Error;
use tunesync_types::{ForwardError, SyncError};

use crate::sync::StoreError;

/// Main error type for all TuneSync core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Network request failed (HTTP client).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Remote store operation failed.
    #[error("Remote store error: {0}")]
    Store(#[from] StoreError),

    /// Forwarding proxy failed.
    #[error("Proxy error: {0}")]
    Forward(#[from] ForwardError),

    /// Upload, download or migration failed.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for TuneSync operations.
pub type AppResult<T> = Result<T, AppError>;
