//! Application and server configuration models.

mod app;
mod enums;
mod server;
mod webdav;

pub use app::{ApiConfig, AppSettings};
pub use enums::ConflictStrategy;
pub use server::{default_upstream_timeout, ServerConfig};
pub use webdav::WebDavConfig;
