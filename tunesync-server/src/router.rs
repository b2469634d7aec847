use axum::{http::Method, http::StatusCode, response::IntoResponse, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use tunesync_core::proxy::{build_proxy_router, ProxyState};

/// Health endpoints plus the forwarding proxy.
///
/// The proxy sets its own CORS headers; the layer here only covers the
/// service endpoints.
pub fn build_router(proxy: ProxyState) -> Router {
    let service_routes = Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/version", get(version_info))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]));

    service_routes.merge(build_proxy_router(proxy))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, axum::Json(serde_json::json!({"status": "ok"})))
}

async fn version_info() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "name": "tunesync",
            "cargo_version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
