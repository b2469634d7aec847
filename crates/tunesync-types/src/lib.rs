//! # TuneSync Types
//!
//! Core types, models, and error definitions for TuneSync.
//!
//! This crate provides the foundational type system shared by the proxy, the
//! sync engine, and the server binary:
//!
//! - **`error`** - Typed error hierarchy for forwarding and synchronization
//! - **`models`** - Domain models (AppSnapshot, sync entities, configuration)
//!
//! ## Architecture Role
//!
//! `tunesync-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!            tunesync-types (this crate)
//!                    │
//!                    ▼
//!            tunesync-core (proxy + sync)
//!                    │
//!                    ▼
//!            tunesync-server
//! ```
//!
//! Every model serializes with camelCase keys because the same JSON is read
//! and written by the browser client.

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ForwardError, SyncError};

// Re-export core model types
pub use models::{
    current_timestamp_ms, ApiConfig, AppSettings, AppSnapshot, ConflictStrategy, Favorites,
    FileInfo, History, HistoryEntry, PlayCounts, Playlist, ServerConfig, SyncEntity, SyncMetadata,
    WebDavConfig,
};
