//! Forwarding proxy errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Client-facing message for an unresolvable target.
pub const INVALID_TARGET_MESSAGE: &str = "Invalid WebDAV proxy target";
/// Client-facing message for a failed upstream exchange.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "WebDAV proxy request failed";

/// Errors that can occur while forwarding a request.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ForwardError {
    /// The encoded path does not name a usable upstream (fewer than two
    /// segments, unsupported scheme, empty host)
    #[error("Invalid target: {reason}")]
    InvalidTarget { reason: String },

    /// Network, DNS, timeout or body read failure talking to the upstream
    #[error("Upstream failure: {message}")]
    UpstreamFailure { message: String },

    /// Inbound method is not on the forwarding allow-list
    #[error("Method not allowed: {method}")]
    MethodNotAllowed { method: String },

    /// Request body exceeded the buffering limit
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Request body could not be read (client went away mid-upload)
    #[error("Failed to read request body: {message}")]
    BodyRead { message: String },
}

impl ForwardError {
    pub fn invalid_target(reason: impl Into<String>) -> Self {
        Self::InvalidTarget { reason: reason.into() }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamFailure { message: message.into() }
    }

    /// Get HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidTarget { .. } => 400,
            Self::UpstreamFailure { .. } => 502,
            Self::MethodNotAllowed { .. } => 405,
            Self::PayloadTooLarge { .. } => 413,
            Self::BodyRead { .. } => 400,
        }
    }

    /// Stable message placed in the `{"error": ...}` body.
    ///
    /// Internal details stay in the logs; callers only ever see these strings.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::InvalidTarget { .. } => INVALID_TARGET_MESSAGE,
            Self::UpstreamFailure { .. } => UPSTREAM_FAILURE_MESSAGE,
            Self::MethodNotAllowed { .. } => "Method not allowed",
            Self::PayloadTooLarge { .. } => "Request body too large",
            Self::BodyRead { .. } => "Failed to read request body",
        }
    }

    /// Caused by the inbound request rather than the upstream (4xx).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::UpstreamFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(ForwardError::invalid_target("one segment").http_status_code(), 400);
        assert_eq!(ForwardError::upstream("connection refused").http_status_code(), 502);
        let body = ForwardError::BodyRead { message: "connection reset".to_string() };
        assert_eq!(body.http_status_code(), 400);
        assert!(body.is_client_error());
    }

    #[test]
    fn test_client_message_hides_details() {
        let err = ForwardError::upstream("dns error: no record for dav.internal.lan");
        assert_eq!(err.client_message(), UPSTREAM_FAILURE_MESSAGE);
        assert!(!err.is_client_error());
    }
}
