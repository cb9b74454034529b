// Proxy module.
// Request handling and the HTTP server around it.

pub mod handler;
pub mod server;

pub use handler::{Proxy, ProxyOutcome};
pub use server::{build_router, start_server};
