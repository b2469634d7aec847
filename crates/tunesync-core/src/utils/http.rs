use std::time::Duration;

/// Build an HTTP client bounded by `timeout` that never follows redirects.
///
/// Both the forwarding proxy and the WebDAV client relay 3xx answers to
/// their caller instead of silently crossing to another origin.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(timeout.max(Duration::from_millis(100)))
        .redirect(reqwest::redirect::Policy::none())
        .tcp_nodelay(true)
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))
}
