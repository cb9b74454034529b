// tilecache entry point.
// Parses configuration, sets up logging and serves the proxy.

use std::sync::Arc;

use clap::Parser;

use tilecache::cache::FsCacheStore;
use tilecache::upstream::HttpUpstream;
use tilecache::{Cli, Proxy, logging, start_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Cli::parse().into_config();
    logging::init(&config);

    let store = FsCacheStore::new(&config.cache_dir);
    let upstream = HttpUpstream::new(&config.upstream)?;
    let proxy = Proxy::new(Arc::new(store), Arc::new(upstream));

    start_server(&config, proxy).await
}
