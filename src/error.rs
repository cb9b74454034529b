// Error types for tilecache.
// Covers cache corruption, upstream transport failures, and filesystem errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Cache entry '{key}' is not valid JSON: {source}")]
    CorruptCacheEntry {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Upstream returned 200 for {path} but the body is not valid JSON: {source}")]
    UpstreamNotJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProxyError>;

/// JSON body shared by every error the proxy reports to its caller.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl ProxyError {
    /// Transport status used when the error reaches the HTTP layer.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Transport(_) | ProxyError::UpstreamNotJson { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ProxyError::CorruptCacheEntry { .. } | ProxyError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (self.status(), Json(ErrorEnvelope::new(self.to_string()))).into_response()
    }
}
