// Upstream API HTTP client.
// Forwards the original path and query string to the proxied API.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;

/// Default base URL of the proxied API.
pub const DEFAULT_UPSTREAM_BASE: &str = "https://api.mapbox.com/";

/// Status and body of a single upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Source of responses for cache misses.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetch the original (unsanitized) path with its raw query string.
    async fn fetch(&self, path: &str, query: &str) -> Result<UpstreamResponse>;
}

/// Upstream backed by plain HTTP GETs.
///
/// No timeout, retry or auth headers; reqwest defaults apply.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    base_url: String,
}

impl HttpUpstream {
    /// Create a client for the given base URL, ensuring it ends with `/`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full upstream URL for a request; the `?` is always present.
    pub fn url_for(&self, path: &str, query: &str) -> String {
        format!("{}{}?{}", self.base_url, path, query)
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, path: &str, query: &str) -> Result<UpstreamResponse> {
        let url = self.url_for(path, query);
        tracing::info!("Requesting from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(UpstreamResponse { status, body })
    }
}
