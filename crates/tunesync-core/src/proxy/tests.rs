#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use tunesync_types::ForwardError;

use super::*;

const MOUNT: &str = "/api/webdav-proxy";

/// Resolver spy: counts calls, optionally pins every request to one target.
#[derive(Default)]
struct CountingResolver {
    calls: AtomicUsize,
    fixed: Option<ResolvedTarget>,
}

impl TargetResolver for CountingResolver {
    fn resolve(&self, request: &TargetRequest) -> Result<ResolvedTarget, ForwardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fixed {
            Some(target) => Ok(target.clone()),
            None => resolve_target(request),
        }
    }
}

fn closed_port_target() -> ResolvedTarget {
    ResolvedTarget {
        scheme: "http".to_string(),
        host: "127.0.0.1:1".to_string(),
        path: "/music-app/".to_string(),
        query: None,
    }
}

fn server_with(resolver: Arc<CountingResolver>, body_limit: usize) -> TestServer {
    let forwarder = Forwarder::new(MOUNT, Duration::from_secs(2), body_limit)
        .unwrap()
        .with_resolver(resolver);
    TestServer::new(build_proxy_router(Arc::new(forwarder))).unwrap()
}

#[tokio::test]
async fn test_options_short_circuits_resolver() {
    let resolver = Arc::new(CountingResolver::default());
    let server = server_with(resolver.clone(), 1024);

    for path in ["/api/webdav-proxy/https/example.com/a", "/api/webdav-proxy/ftp", MOUNT] {
        let response = server.method(Method::OPTIONS, path).await;
        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.as_bytes().is_empty());
        assert_eq!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_preflight_reflects_origin() {
    let server = server_with(Arc::new(CountingResolver::default()), 1024);
    let response = server
        .method(Method::OPTIONS, "/api/webdav-proxy/https/example.com/")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://player.example"))
        .await;

    let headers = response.headers();
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "https://player.example");
    assert_eq!(headers.get(header::VARY).unwrap(), "Origin");
    assert_eq!(headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "86400");
    assert!(headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("PROPFIND"));
}

#[tokio::test]
async fn test_invalid_target_is_400() {
    let resolver = Arc::new(CountingResolver::default());
    let server = server_with(resolver.clone(), 1024);

    for path in ["/api/webdav-proxy/https", "/api/webdav-proxy/ftp/example.com/x"] {
        let response = server.get(path).await;
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Invalid WebDAV proxy target");
        assert_eq!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_bare_mount_with_slash_is_handled() {
    let resolver = Arc::new(CountingResolver::default());
    let server = server_with(resolver.clone(), 1024);
    let path = format!("{}/", MOUNT);

    let preflight = server
        .method(Method::OPTIONS, &path)
        .add_header(header::ORIGIN, HeaderValue::from_static("https://app.example.com"))
        .await;
    preflight.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(
        preflight.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://app.example.com"
    );
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);

    let response = server.get(&path).await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid WebDAV proxy target");
    assert_eq!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
}

#[tokio::test]
async fn test_unlisted_method_is_405() {
    let resolver = Arc::new(CountingResolver::default());
    let server = server_with(resolver.clone(), 1024);

    let response = server
        .method(Method::from_bytes(b"SEARCH").unwrap(), "/api/webdav-proxy/https/example.com/")
        .await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_oversized_body_is_413() {
    let resolver =
        Arc::new(CountingResolver { calls: AtomicUsize::new(0), fixed: Some(closed_port_target()) });
    let server = server_with(resolver, 16);

    let response = server
        .put("/api/webdav-proxy/http/127.0.0.1%3A1/music-app/settings.json")
        .bytes(vec![b'x'; 64].into())
        .await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Request body too large");
}

#[tokio::test]
async fn test_unreachable_upstream_is_502() {
    let resolver =
        Arc::new(CountingResolver { calls: AtomicUsize::new(0), fixed: Some(closed_port_target()) });
    let server = server_with(resolver, 1024);

    let response = server
        .method(Method::from_bytes(b"PROPFIND").unwrap(), "/api/webdav-proxy/http/127.0.0.1%3A1/")
        .add_header(HeaderName::from_static("depth"), HeaderValue::from_static("1"))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "WebDAV proxy request failed");
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_EXPOSE_HEADERS));
}

#[test]
fn test_error_response_status_matches_error() {
    let cases = [
        (ForwardError::invalid_target("x"), StatusCode::BAD_REQUEST),
        (ForwardError::upstream("x"), StatusCode::BAD_GATEWAY),
        (ForwardError::PayloadTooLarge { limit: 1 }, StatusCode::PAYLOAD_TOO_LARGE),
    ];
    for (err, status) in cases {
        assert_eq!(error_response(&err).status(), status);
    }
}
