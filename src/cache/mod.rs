// Cache module for persisted upstream responses.
// Sanitizes request paths into keys and stores raw bodies under them.

pub mod paths;
pub mod store;

pub use paths::{entry_path, is_cacheable, sanitize_key};
pub use store::{CacheStore, FsCacheStore, MemoryCacheStore};
