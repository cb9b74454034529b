// Upstream API module.
// Fetches cache misses from the proxied third-party API.

pub mod client;

pub use client::{DEFAULT_UPSTREAM_BASE, HttpUpstream, Upstream, UpstreamResponse};
