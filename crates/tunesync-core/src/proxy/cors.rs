//! CORS headers for the forwarding proxy.
//!
//! The proxy answers for arbitrary WebDAV methods, so the headers are set by
//! hand on every response instead of going through `tower_http::cors`.

use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::Method;

/// Methods the proxy forwards.
pub const ALLOWED_METHODS: &[&str] = &[
    "GET",
    "HEAD",
    "POST",
    "PUT",
    "DELETE",
    "PATCH",
    "OPTIONS",
    "PROPFIND",
    "PROPPATCH",
    "MKCOL",
    "COPY",
    "MOVE",
    "LOCK",
    "UNLOCK",
    "REPORT",
];

const ALLOW_HEADERS: &str = "*, Content-Type, Authorization, Depth, Overwrite, Destination, \
If-Modified-Since, If-Unmodified-Since, If-Match, If-None-Match, Translate, Range, Timeout, Dav";

const EXPOSE_HEADERS: &str = "Content-Length, ETag, Date, Location, DAV";

const MAX_AGE_SECS: &str = "86400";

pub fn is_allowed_method(method: &Method) -> bool {
    ALLOWED_METHODS.contains(&method.as_str())
}

/// Origin to echo back: the caller's when exactly one was sent, else `*`.
pub fn allow_origin(request_headers: &HeaderMap) -> HeaderValue {
    let mut origins = request_headers.get_all(header::ORIGIN).iter();
    match (origins.next(), origins.next()) {
        (Some(origin), None) if !origin.is_empty() => origin.clone(),
        _ => HeaderValue::from_static("*"),
    }
}

/// Write the proxy's CORS headers, replacing any already present.
pub fn apply_cors_headers(headers: &mut HeaderMap, origin: HeaderValue) {
    if origin != "*" {
        headers.append(header::VARY, HeaderValue::from_static("Origin"));
    }
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(
            "GET, HEAD, POST, PUT, DELETE, PATCH, OPTIONS, PROPFIND, PROPPATCH, MKCOL, COPY, MOVE, LOCK, UNLOCK, REPORT",
        ),
    );
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS));
    headers
        .insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static(EXPOSE_HEADERS));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reflects_single_origin() {
        let mut req = HeaderMap::new();
        req.insert(header::ORIGIN, HeaderValue::from_static("https://player.example"));
        assert_eq!(allow_origin(&req), "https://player.example");
    }

    #[test]
    fn test_star_when_absent_or_multiple() {
        assert_eq!(allow_origin(&HeaderMap::new()), "*");

        let mut req = HeaderMap::new();
        req.append(header::ORIGIN, HeaderValue::from_static("https://a.example"));
        req.append(header::ORIGIN, HeaderValue::from_static("https://b.example"));
        assert_eq!(allow_origin(&req), "*");
    }

    #[test]
    fn test_method_list_matches_header() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers, HeaderValue::from_static("*"));
        let listed = headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap().to_str().unwrap();
        assert_eq!(listed, ALLOWED_METHODS.join(", "));
        assert!(headers.get(header::VARY).is_none());
        assert_eq!(headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "86400");
    }

    #[test]
    fn test_webdav_methods_allowed() {
        for m in ["PROPFIND", "MKCOL", "LOCK", "REPORT"] {
            assert!(is_allowed_method(&Method::from_bytes(m.as_bytes()).unwrap()));
        }
        assert!(!is_allowed_method(&Method::from_bytes(b"SEARCH").unwrap()));
    }
}
