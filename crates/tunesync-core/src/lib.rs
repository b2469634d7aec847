//! # TuneSync Core
//!
//! Network-facing logic of the TuneSync music player backend.
//!
//! ## Architecture
//!
//! ```text
//! tunesync-core/src/
//! ├── proxy/     # Forwarding proxy: target resolution, header sanitizing, relay
//! ├── sync/      # Multi-file WebDAV sync: upload, download/merge, conflicts
//! ├── modules/   # Local persistence, configuration, logging
//! └── utils/     # HTTP client construction
//! ```
//!
//! The sync engine talks to the remote store through [`sync::RemoteStore`];
//! the WebDAV implementation can route every call through the forwarding
//! proxy when the store is cross-origin for the calling client.

#![allow(clippy::map_err_ignore, reason = "Error context is provided in the replacement message")]
#![cfg_attr(
    test,
    allow(clippy::panic, clippy::print_stdout, clippy::assertions_on_result_states)
)]

pub mod error;
pub mod modules;
pub mod proxy;
pub mod sync;
pub mod utils;

// Re-export commonly used types
pub use error::{AppError, AppResult};
pub use proxy::{build_proxy_router, Forwarder, ProxyState, ResolvedTarget};
pub use sync::{resolve_conflict, RemoteStore, SyncEngine, WebDavClient};
