// Command-line and environment configuration.
// Resolves bind address, cache directory, upstream URL and log settings.

use std::path::PathBuf;

use clap::Parser;

use crate::upstream::DEFAULT_UPSTREAM_BASE;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_CACHE_DIR: &str = "./mbcache";

/// Caching reverse proxy for the Mapbox API
#[derive(Parser, Debug)]
#[command(name = "tilecache")]
#[command(about = "Caching reverse proxy for the Mapbox tile and geocoding API")]
#[command(version)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "TILECACHE_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "TILECACHE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory holding one file per cached path
    #[arg(long, env = "TILECACHE_CACHE_DIR", default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Base URL that request paths are appended to
    #[arg(long, env = "TILECACHE_UPSTREAM", default_value = DEFAULT_UPSTREAM_BASE)]
    pub upstream: String,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, env = "TILECACHE_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "TILECACHE_LOG_JSON")]
    pub log_json: bool,
}

/// Resolved proxy settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub cache_dir: PathBuf,
    pub upstream: String,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            upstream: DEFAULT_UPSTREAM_BASE.to_string(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ProxyConfig {
    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Cli {
    pub fn into_config(self) -> ProxyConfig {
        ProxyConfig {
            host: self.host,
            port: self.port,
            cache_dir: self.cache_dir,
            upstream: self.upstream,
            log_level: self.log_level,
            log_json: self.log_json,
        }
    }
}
