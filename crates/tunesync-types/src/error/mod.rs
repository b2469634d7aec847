//! Typed error definitions for TuneSync.
//!
//! One error type per network-facing domain. All errors are designed to be:
//!
//! - **Serializable** for API and CLI output via serde
//! - **Displayable** for logging via Display trait
//! - **Matchable** for error handling logic via enum variants
//! - **Composable** via thiserror derive macros

mod forward;
mod sync;

pub use forward::{ForwardError, INVALID_TARGET_MESSAGE, UPSTREAM_FAILURE_MESSAGE};
pub use sync::SyncError;
