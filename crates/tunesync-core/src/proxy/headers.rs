//! Hop-by-hop header filtering.

use axum::http::header::{HeaderMap, HeaderName, CONNECTION};

/// Headers that only describe the current connection and must not cross the
/// proxy boundary in either direction.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

/// Returns true for the fixed hop-by-hop set. `HeaderName` is always
/// lowercase, so the comparison is case-insensitive.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Extra names listed in `Connection: close, x-foo` style tokens.
fn connection_tokens(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn filter_headers(headers: &HeaderMap, drop: impl Fn(&HeaderName) -> bool) -> HeaderMap {
    let tokens = connection_tokens(headers);
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_hop_by_hop(name) || tokens.iter().any(|t| t == name.as_str()) || drop(name) {
            continue;
        }
        // append keeps every value of a repeated header as its own entry
        out.append(name.clone(), value.clone());
    }
    out
}

/// Inbound headers to send upstream.
pub fn sanitize_request_headers(headers: &HeaderMap) -> HeaderMap {
    filter_headers(headers, |_| false)
}

/// Upstream headers to relay back to the caller.
///
/// CORS headers are dropped as well; the proxy sets its own.
pub fn sanitize_response_headers(headers: &HeaderMap) -> HeaderMap {
    filter_headers(headers, |name| name.as_str().starts_with("access-control-"))
}
