//! Protocol-agnostic forwarding proxy for browser clients that cannot reach
//! a WebDAV origin directly.

pub mod cors;
pub mod forward;
pub mod headers;
pub mod server;
pub mod target;

#[cfg(test)]
mod tests;

pub use forward::{error_response, Forwarder};
pub use headers::{sanitize_request_headers, sanitize_response_headers};
pub use server::{build_proxy_router, ProxyState};
pub use target::{
    encode_proxy_path, encode_proxy_url, resolve_target, PathTargetResolver, ResolvedTarget,
    TargetRequest, TargetResolver,
};
