//! WebDAV implementation of [`RemoteStore`].

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Method, RequestBuilder, StatusCode};
use tracing::debug;
use tunesync_types::WebDavConfig;

use super::store::{RemoteStore, StoreError, StoreResult};
use crate::proxy::encode_proxy_url;
use crate::utils::http::build_http_client;

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:"><d:prop><d:resourcetype/><d:getlastmodified/></d:prop></d:propfind>"#;

static HREF_REGEX: OnceLock<Regex> = OnceLock::new();

fn href_regex() -> &'static Regex {
    HREF_REGEX.get_or_init(|| {
        Regex::new(r"(?is)<(?:[a-z0-9_]+:)?href(?:\s[^>]*)?>\s*([^<]*?)\s*</(?:[a-z0-9_]+:)?href>")
            .expect("Href regex is valid")
    })
}

fn webdav_method(name: &str) -> StoreResult<Method> {
    Method::from_bytes(name.as_bytes())
        .map_err(|e| StoreError::Config(format!("invalid method {}: {}", name, e)))
}

/// Percent-encode every segment of a store path.
fn encode_store_path(path: &str) -> String {
    path.split('/').map(|s| urlencoding::encode(s).into_owned()).collect::<Vec<_>>().join("/")
}

/// WebDAV client with basic auth passthrough.
///
/// When a proxy base is configured every call is rewritten to
/// `<proxy>/<scheme>/<host>/<path>` and relayed by the forwarding proxy.
#[derive(Clone)]
pub struct WebDavClient {
    http: reqwest::Client,
    base_url: String,
    base_path: String,
    username: String,
    password: String,
    proxy_base: Option<String>,
}

impl WebDavClient {
    pub fn new(config: &WebDavConfig) -> StoreResult<Self> {
        if !config.is_configured() {
            return Err(StoreError::Config("WebDAV url is empty".to_string()));
        }
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| StoreError::Config(format!("invalid WebDAV url: {}", e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(StoreError::Config(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        let http = build_http_client(Duration::from_millis(config.timeout_ms))
            .map_err(StoreError::Config)?;

        Ok(Self {
            http,
            base_path: parsed.path().trim_end_matches('/').to_string(),
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
            proxy_base: config.proxy_url.clone().filter(|p| !p.trim().is_empty()),
        })
    }

    /// Route every call through the forwarding proxy mounted at `proxy_base`.
    pub fn with_proxy(mut self, proxy_base: impl Into<String>) -> Self {
        self.proxy_base = Some(proxy_base.into());
        self
    }

    /// Final URL for a store path, rewritten through the proxy when one is set.
    pub fn target_url(&self, path: &str) -> StoreResult<String> {
        let upstream = format!("{}{}", self.base_url, encode_store_path(path));
        match &self.proxy_base {
            Some(proxy) => encode_proxy_url(proxy, &upstream)
                .map_err(|e| StoreError::Config(e.to_string())),
            None => Ok(upstream),
        }
    }

    fn request(&self, method: Method, path: &str) -> StoreResult<RequestBuilder> {
        let url = self.target_url(path)?;
        let builder = self.http.request(method, url);
        Ok(if self.username.is_empty() && self.password.is_empty() {
            builder
        } else {
            builder.basic_auth(&self.username, Some(&self.password))
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> StoreResult<reqwest::Response> {
        let name = method.to_string();
        let request = build(self.request(method, path)?);
        let response =
            request.send().await.map_err(|e| StoreError::transport(&name, path, e))?;
        debug!("{} {} -> {}", name, path, response.status().as_u16());
        Ok(response)
    }

    /// PROPFIND with `Depth: 0` on the base URL.
    pub async fn check_root(&self) -> StoreResult<()> {
        let response = self
            .send(webdav_method("PROPFIND")?, "/", |b| {
                b.header("Depth", "0")
                    .header("Content-Type", "application/xml; charset=utf-8")
                    .body(PROPFIND_BODY)
            })
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(StoreError::status("PROPFIND", "/", response.status().as_u16()))
        }
    }

    /// Turn a PROPFIND href into a store path relative to the base URL.
    fn href_to_path(&self, href: &str) -> Option<String> {
        let href = href.replace("&amp;", "&");
        let raw_path = if href.starts_with("http://") || href.starts_with("https://") {
            url::Url::parse(&href).ok()?.path().to_string()
        } else {
            href
        };
        let decoded = urlencoding::decode(&raw_path).ok()?.into_owned();
        let base = urlencoding::decode(&self.base_path).ok()?.into_owned();
        let relative = decoded.strip_prefix(base.as_str()).unwrap_or(&decoded);
        Some(if relative.starts_with('/') { relative.to_string() } else { format!("/{}", relative) })
    }
}

/// All `href` values of a multistatus body, in document order.
pub fn parse_hrefs(body: &str) -> Vec<String> {
    href_regex()
        .captures_iter(body)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .filter(|h| !h.is_empty())
        .collect()
}

#[async_trait]
impl RemoteStore for WebDavClient {
    async fn read_text(&self, path: &str) -> StoreResult<Option<String>> {
        let response = self.send(Method::GET, path, |b| b).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => response
                .text()
                .await
                .map(Some)
                .map_err(|e| StoreError::transport("GET", path, e)),
            s => Err(StoreError::status("GET", path, s.as_u16())),
        }
    }

    async fn write_text(&self, path: &str, body: String) -> StoreResult<()> {
        let response = self
            .send(Method::PUT, path, |b| {
                b.header("Content-Type", "application/json; charset=utf-8").body(body)
            })
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(StoreError::status("PUT", path, response.status().as_u16()))
        }
    }

    async fn delete(&self, path: &str) -> StoreResult<()> {
        let response = self.send(Method::DELETE, path, |b| b).await?;
        match response.status() {
            s if s.is_success() || s == StatusCode::NOT_FOUND => Ok(()),
            s => Err(StoreError::status("DELETE", path, s.as_u16())),
        }
    }

    async fn create_collection(&self, path: &str) -> StoreResult<()> {
        let response = self.send(webdav_method("MKCOL")?, path, |b| b).await?;
        match response.status() {
            // 405: collection already exists
            s if s.is_success() || s == StatusCode::METHOD_NOT_ALLOWED => Ok(()),
            s => Err(StoreError::status("MKCOL", path, s.as_u16())),
        }
    }

    async fn list(&self, path: &str) -> StoreResult<Vec<String>> {
        let dir = if path.ends_with('/') { path.to_string() } else { format!("{}/", path) };
        let response = self
            .send(webdav_method("PROPFIND")?, &dir, |b| {
                b.header("Depth", "1")
                    .header("Content-Type", "application/xml; charset=utf-8")
                    .body(PROPFIND_BODY)
            })
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::status("PROPFIND", &dir, status.as_u16()));
        }
        let body = response.text().await.map_err(|e| StoreError::transport("PROPFIND", &dir, e))?;

        let own = dir.trim_end_matches('/');
        Ok(parse_hrefs(&body)
            .iter()
            .filter_map(|h| self.href_to_path(h))
            .filter(|p| p.trim_end_matches('/') != own && p.starts_with(dir.as_str()))
            .collect())
    }
}
