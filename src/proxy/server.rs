// Axum HTTP surface for the caching proxy.
// Maps every GET path onto the proxy handler and serves it.

use std::sync::Arc;

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;

use super::handler::{Proxy, ProxyOutcome};

impl IntoResponse for ProxyOutcome {
    fn into_response(self) -> Response {
        // Upstream failures are reported in the body; the status stays 200.
        match self.into_body() {
            Some(body) => Json(body).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// Percent-decode a URI path and drop its leading `/`.
///
/// Sequences that are not valid UTF-8 become U+FFFD instead of rejecting
/// the request.
pub fn decode_path(raw: &str) -> String {
    let raw = raw.strip_prefix('/').unwrap_or(raw);
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

async fn proxy_request(
    State(proxy): State<Arc<Proxy>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let path = decode_path(uri.path());
    let query = uri.query().unwrap_or_default();
    match proxy.handle(&path, query).await {
        Ok(outcome) => outcome.into_response(),
        Err(err) => err.into_response(),
    }
}

/// Build the catch-all router for a proxy.
pub fn build_router(proxy: Proxy) -> Router {
    Router::new()
        .route("/", get(proxy_request))
        .route("/{*path}", get(proxy_request))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(proxy))
}

/// Bind the configured address and serve until the process exits.
pub async fn start_server(
    config: &ProxyConfig,
    proxy: Proxy,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = build_router(proxy);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        cache_dir = %config.cache_dir.display(),
        upstream = %config.upstream,
        "tilecache listening on {addr}"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
