//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Parse a `RUST_LOG`-style directive list (e.g. `info,tunesync_core=debug`).
pub fn build_filter(directives: &str) -> Result<EnvFilter, String> {
    EnvFilter::try_new(directives).map_err(|e| format!("Invalid log filter '{}': {}", directives, e))
}

/// Install the global fmt subscriber.
pub fn init_logger(directives: &str) -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(directives)?)
        .with_target(false)
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))
}
