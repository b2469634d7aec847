//! Upstream target resolution.
//!
//! The proxy carries its real destination in the request path:
//!
//! ```text
//! /api/webdav-proxy/https/dav.example.com/remote.php/dav/music-app/?foo=1
//!                   └─┬─┘ └──────┬──────┘ └──────────┬──────────┘
//!                   scheme      host              remainder
//! ```
//!
//! Scheme and host are percent-encoded individually, as is every remainder
//! segment. Resolution is a pure function of the path and query so it can be
//! tested without a server.

use std::fmt;

use tunesync_types::ForwardError;
use url::form_urlencoded;

/// Query parameter that carries path segments for catch-all style clients.
/// It is never forwarded upstream.
pub const PATH_PARAM: &str = "path";

/// Inputs of target resolution, still percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetRequest {
    /// Path segments below the proxy mount point
    pub segments: Vec<String>,
    /// Whether the inbound path (ignoring the query) ended with `/`
    pub trailing_slash: bool,
    /// Decoded query pairs in arrival order
    pub query: Vec<(String, String)>,
}

impl TargetRequest {
    /// Split the part of the path below the mount point plus the raw query.
    ///
    /// When the path itself carries no segments, repeated `path` query
    /// parameters are used instead.
    pub fn from_parts(path_below_mount: &str, raw_query: Option<&str>) -> Self {
        let query: Vec<(String, String)> = raw_query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        let trimmed = path_below_mount.strip_prefix('/').unwrap_or(path_below_mount);
        let segments: Vec<String> = if trimmed.is_empty() {
            query
                .iter()
                .filter(|(k, _)| k == PATH_PARAM)
                .map(|(_, v)| v.clone())
                .collect()
        } else {
            trimmed.split('/').map(str::to_string).collect()
        };

        Self { segments, trailing_slash: path_below_mount.ends_with('/'), query }
    }
}

/// Fully resolved forwarding target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// `http` or `https`, lowercased
    pub scheme: String,
    /// Decoded host, including a port when one was given
    pub host: String,
    /// Decoded remote path, always starting with `/`
    pub path: String,
    /// Re-encoded query string without the leading `?`
    pub query: Option<String>,
}

impl ResolvedTarget {
    /// Absolute upstream URL.
    pub fn url(&self) -> String {
        match &self.query {
            Some(q) => format!("{}://{}{}?{}", self.scheme, self.host, self.path, q),
            None => format!("{}://{}{}", self.scheme, self.host, self.path),
        }
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// Resolution seam used by the forwarder.
pub trait TargetResolver: Send + Sync {
    fn resolve(&self, request: &TargetRequest) -> Result<ResolvedTarget, ForwardError>;
}

/// Default resolver backed by [`resolve_target`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PathTargetResolver;

impl TargetResolver for PathTargetResolver {
    fn resolve(&self, request: &TargetRequest) -> Result<ResolvedTarget, ForwardError> {
        resolve_target(request)
    }
}

fn decode_segment(segment: &str) -> Result<String, ForwardError> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|e| ForwardError::invalid_target(format!("malformed percent-encoding: {}", e)))
}

/// Resolve `(scheme, host, ...remainder)` into an upstream target.
pub fn resolve_target(request: &TargetRequest) -> Result<ResolvedTarget, ForwardError> {
    let [scheme_seg, host_seg, rest @ ..] = request.segments.as_slice() else {
        return Err(ForwardError::invalid_target(format!(
            "expected at least scheme and host segments, got {}",
            request.segments.len()
        )));
    };

    let scheme = decode_segment(scheme_seg)?.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(ForwardError::invalid_target(format!("unsupported scheme '{}'", scheme)));
    }

    let host = decode_segment(host_seg)?;
    if host.is_empty() {
        return Err(ForwardError::invalid_target("empty host"));
    }

    let decoded_rest =
        rest.iter().map(|s| decode_segment(s)).collect::<Result<Vec<_>, _>>()?;
    let mut path = format!("/{}", decoded_rest.join("/"));
    if path == "//" {
        path = "/".to_string();
    }
    if request.trailing_slash && !path.ends_with('/') {
        path.push('/');
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut forwarded = 0usize;
    for (key, value) in request.query.iter().filter(|(k, _)| k != PATH_PARAM) {
        serializer.append_pair(key, value);
        forwarded += 1;
    }
    let query = (forwarded > 0).then(|| serializer.finish());

    Ok(ResolvedTarget { scheme, host, path, query })
}

/// Build the proxy path for `target` under `mount` (inverse of resolution).
///
/// Every remainder segment is encoded on its own, so a segment that already
/// contains `%2F` survives the round trip untouched.
pub fn encode_proxy_path(mount: &str, target: &ResolvedTarget) -> String {
    let mut out = String::from(mount.trim_end_matches('/'));
    out.push('/');
    out.push_str(&urlencoding::encode(&target.scheme));
    out.push('/');
    out.push_str(&urlencoding::encode(&target.host));

    let remainder = target.path.trim_start_matches('/');
    if !remainder.is_empty() || target.path.ends_with('/') {
        out.push('/');
        let encoded: Vec<String> =
            remainder.split('/').map(|s| urlencoding::encode(s).into_owned()).collect();
        out.push_str(&encoded.join("/"));
    }

    if let Some(q) = &target.query {
        out.push('?');
        out.push_str(q);
    }
    out
}

/// Rewrite an absolute upstream URL so it goes through the proxy at `proxy_base`.
///
/// `proxy_base` may be absolute (`http://localhost:8046/api/webdav-proxy`)
/// or a bare mount path. The upstream path is taken in its URL-encoded form.
pub fn encode_proxy_url(proxy_base: &str, upstream: &str) -> Result<String, ForwardError> {
    let url = url::Url::parse(upstream)
        .map_err(|e| ForwardError::invalid_target(format!("invalid upstream url: {}", e)))?;

    let scheme = url.scheme().to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(ForwardError::invalid_target(format!("unsupported scheme '{}'", scheme)));
    }
    let host = match (url.host_str(), url.port()) {
        (Some(h), Some(p)) => format!("{}:{}", h, p),
        (Some(h), None) => h.to_string(),
        (None, _) => return Err(ForwardError::invalid_target("empty host")),
    };

    let target = ResolvedTarget {
        scheme,
        host,
        path: url.path().to_string(),
        query: url.query().map(str::to_string),
    };
    Ok(encode_proxy_path(proxy_base, &target))
}
