use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use tower_http::trace::TraceLayer;

use super::forward::Forwarder;

/// Shared, immutable proxy state.
pub type ProxyState = Arc<Forwarder>;

/// Router serving `<mount>`, `<mount>/` and everything below it.
///
/// The bare forms have no target and end up as a 400 from the forwarder,
/// still with CORS headers.
pub fn build_proxy_router(state: ProxyState) -> Router {
    let mount = state.mount().to_string();
    Router::new()
        .route(&mount, any(handle_forward))
        .route(&format!("{}/", mount), any(handle_forward))
        .route(&format!("{}/*rest", mount), any(handle_forward))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_forward(State(forwarder): State<ProxyState>, request: Request) -> Response {
    forwarder.forward(request).await
}
