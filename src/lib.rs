// tilecache library.
// Caching reverse proxy that stores upstream API responses on disk, keyed by request path.

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod upstream;

pub use config::{Cli, ProxyConfig};
pub use error::{ProxyError, Result};
pub use proxy::{Proxy, ProxyOutcome, build_router, start_server};
