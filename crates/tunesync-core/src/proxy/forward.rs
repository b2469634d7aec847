//! Request forwarding: the proxy's single operation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http_body_util::LengthLimitError;
use serde_json::json;
use tracing::{debug, info, warn};
use tunesync_types::ForwardError;

use super::cors;
use super::headers::{sanitize_request_headers, sanitize_response_headers};
use super::target::{PathTargetResolver, TargetRequest, TargetResolver};
use crate::utils::http::build_http_client;

/// Stateless relay from `/<mount>/<scheme>/<host>/<...path>` to the upstream.
///
/// Holds only immutable state, so concurrent forwards need no coordination.
pub struct Forwarder {
    http: reqwest::Client,
    resolver: Arc<dyn TargetResolver>,
    mount: String,
    body_limit: usize,
}

impl Forwarder {
    pub fn new(mount: &str, timeout: Duration, body_limit: usize) -> Result<Self, String> {
        Ok(Self {
            http: build_http_client(timeout)?,
            resolver: Arc::new(PathTargetResolver),
            mount: mount.trim_end_matches('/').to_string(),
            body_limit,
        })
    }

    /// Replace the target resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn TargetResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Forward one request. Always returns a response carrying CORS headers.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let origin = cors::allow_origin(request.headers());
        let path = request.uri().path().to_string();
        let mut response = match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) => {
                if e.is_client_error() {
                    debug!("Rejected proxy request {}: {}", path, e);
                }
                error_response(&e)
            },
        };
        cors::apply_cors_headers(response.headers_mut(), origin);
        response
    }

    async fn dispatch(&self, request: Request<Body>) -> Result<Response, ForwardError> {
        let (parts, body) = request.into_parts();

        if parts.method == Method::OPTIONS {
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
        if !cors::is_allowed_method(&parts.method) {
            return Err(ForwardError::MethodNotAllowed { method: parts.method.to_string() });
        }

        let below_mount = parts.uri.path().strip_prefix(self.mount.as_str()).unwrap_or_default();
        let target_request = TargetRequest::from_parts(below_mount, parts.uri.query());
        let target = self.resolver.resolve(&target_request)?;

        let mut headers = sanitize_request_headers(&parts.headers);
        let body = if parts.method == Method::GET || parts.method == Method::HEAD {
            None
        } else {
            let bytes = to_bytes(body, self.body_limit)
                .await
                .map_err(|e| body_error(e, self.body_limit))?;
            (!bytes.is_empty()).then_some(bytes)
        };
        match &body {
            Some(bytes) => {
                headers.insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
            },
            None => {
                headers.remove(header::CONTENT_LENGTH);
            },
        }

        let started = Instant::now();
        let mut upstream_request = self.http.request(parts.method.clone(), target.url()).headers(headers);
        if let Some(bytes) = body {
            upstream_request = upstream_request.body(bytes);
        }

        let upstream = upstream_request.send().await.map_err(|e| {
            warn!("WebDAV proxy error: {} {} failed: {}", parts.method, target.host, e);
            ForwardError::upstream(e.to_string())
        })?;

        let status = upstream.status();
        let mut relay_headers = sanitize_response_headers(upstream.headers());
        // No body to recompute framing from: keep the upstream's declared size.
        if parts.method == Method::HEAD || status == StatusCode::NOT_MODIFIED {
            if let Some(length) = upstream.headers().get(header::CONTENT_LENGTH) {
                relay_headers.insert(header::CONTENT_LENGTH, length.clone());
            }
        }
        let bytes = upstream.bytes().await.map_err(|e| {
            warn!("WebDAV proxy error: reading body from {} failed: {}", target.host, e);
            ForwardError::upstream(e.to_string())
        })?;

        info!(
            "{} {}{} -> {} ({} bytes, {}ms)",
            parts.method,
            target.host,
            target.path,
            status.as_u16(),
            bytes.len(),
            started.elapsed().as_millis()
        );

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = relay_headers;
        Ok(response)
    }
}

/// Split `to_bytes` failures into the size limit and everything else.
fn body_error(err: axum::Error, limit: usize) -> ForwardError {
    let inner = err.into_inner();
    if inner.downcast_ref::<LengthLimitError>().is_some() {
        ForwardError::PayloadTooLarge { limit }
    } else {
        ForwardError::BodyRead { message: inner.to_string() }
    }
}

/// JSON error body with a stable message.
pub fn error_response(err: &ForwardError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(json!({ "error": err.client_message() }))).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_body_over_limit_is_payload_too_large() {
        let err = to_bytes(Body::from(vec![0_u8; 64]), 16).await.unwrap_err();
        assert_eq!(body_error(err, 16), ForwardError::PayloadTooLarge { limit: 16 });
    }

    #[test]
    fn test_interrupted_body_is_bad_request() {
        let err = axum::Error::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ));
        let mapped = body_error(err, 16);
        assert!(matches!(mapped, ForwardError::BodyRead { .. }));
        assert_eq!(mapped.http_status_code(), 400);
    }
}
