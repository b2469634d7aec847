//! Core domain models for TuneSync.
//!
//! This module contains the data structures shared by the proxy, the sync
//! engine and the server binary.

pub mod config;
mod snapshot;
pub mod sync;

// Re-export all models
pub use config::{ApiConfig, AppSettings, ConflictStrategy, ServerConfig, WebDavConfig};
pub use snapshot::{AppSnapshot, Favorites, History, HistoryEntry, PlayCounts, Playlist};
pub use sync::{current_timestamp_ms, FileInfo, SyncEntity, SyncMetadata};
