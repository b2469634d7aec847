//! Multi-file synchronization against a remote file store.
//!
//! Each entity is read and written on its own, so a missing or corrupt file
//! only costs that entity. Uploads write entity files first and the metadata
//! descriptor last; nothing is rolled back on failure.

pub mod conflict;
pub mod coordinator;
pub mod download;
pub mod entity_file;
pub mod service;
pub mod store;
pub mod upload;
pub mod webdav;


pub use conflict::{pick_winner, resolve_conflict, Winner};
pub use coordinator::{MigrationOutcome, SyncEngine, SyncOutcome};
pub use download::{download_snapshot, RemoteData};
pub use service::{download_with_config, list_sync_files, test_connection};
pub use store::{MemoryStore, RemoteStore, StoreError, StoreResult};
pub use upload::{upload_snapshot, EntityState, UploadReport};
pub use webdav::WebDavClient;
