// Request handling for the caching proxy.
// Runs the favicon guard, cache lookup, upstream fetch and cache write for one request.

use std::sync::Arc;

use serde_json::Value;

use crate::cache::{CacheStore, is_cacheable, sanitize_key};
use crate::error::{ProxyError, Result};
use crate::upstream::Upstream;

/// Result of handling one request.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyOutcome {
    /// Path starts with `favicon`; nothing else ran.
    NotFound,
    /// Served from the cache.
    Hit(Value),
    /// Fetched from upstream with status 200.
    Fetched(Value),
    /// Upstream answered with a non-200 status; nothing was cached.
    UpstreamError { status: u16, body: Value },
}

impl ProxyOutcome {
    /// JSON body returned to the caller, if any.
    pub fn into_body(self) -> Option<Value> {
        match self {
            ProxyOutcome::NotFound => None,
            ProxyOutcome::Hit(body)
            | ProxyOutcome::Fetched(body)
            | ProxyOutcome::UpstreamError { body, .. } => Some(body),
        }
    }
}

/// The caching proxy, with its store and upstream injected.
#[derive(Clone)]
pub struct Proxy {
    store: Arc<dyn CacheStore>,
    upstream: Arc<dyn Upstream>,
}

impl Proxy {
    pub fn new(store: Arc<dyn CacheStore>, upstream: Arc<dyn Upstream>) -> Self {
        Self { store, upstream }
    }

    /// Handle a request for `path` (no leading `/`) and its raw query string.
    ///
    /// The cache key ignores the query string, so any query for a cached
    /// path returns the stored body.
    pub async fn handle(&self, path: &str, query: &str) -> Result<ProxyOutcome> {
        if path.starts_with("favicon") {
            return Ok(ProxyOutcome::NotFound);
        }

        let key = sanitize_key(path);
        let cacheable = is_cacheable(&key);

        if cacheable && self.store.exists(&key).await? {
            tracing::info!("Cache hit for {}", path);
            let cached = self.store.read(&key).await?;
            return Ok(ProxyOutcome::Hit(cached));
        }

        let response = self.upstream.fetch(path, query).await?;

        if response.is_success() {
            if cacheable {
                // Stored before parsing: a non-JSON body stays cached and fails on later reads too.
                self.store.write(&key, response.body.as_bytes()).await?;
                tracing::debug!(key = %key, bytes = response.body.len(), "cached upstream response");
            } else {
                tracing::debug!(path = %path, "path has no cache key, not caching");
            }

            let parsed = serde_json::from_str(&response.body).map_err(|source| {
                ProxyError::UpstreamNotJson {
                    path: path.to_string(),
                    source,
                }
            })?;
            return Ok(ProxyOutcome::Fetched(parsed));
        }

        tracing::warn!("Got {} for request {}", response.status, path);
        tracing::debug!("{}", response.body);

        let message = format!("Got {} for request {}", response.status, path);
        Ok(ProxyOutcome::UpstreamError {
            status: response.status,
            body: serde_json::json!({ "error": message }),
        })
    }
}
