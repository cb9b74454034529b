// Tracing subscriber setup.
// RUST_LOG wins over the configured default filter.

use tracing_subscriber::EnvFilter;

use crate::config::ProxyConfig;

/// Build the filter from RUST_LOG, falling back to `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(config: &ProxyConfig) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(&config.log_level));
    let result = if config.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing subscriber already set: {e}");
    }
}
