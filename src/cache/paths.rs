// Cache key and path utilities.
// Turns request paths into flat, filesystem-safe cache file names.

use std::path::{Path, PathBuf};

/// Punctuation kept alongside alphanumerics when building a cache key.
const KEEP_CHARS: [char; 3] = [' ', '.', '_'];

/// Sanitize a request path into a cache key.
///
/// Keeps alphanumerics, space, period and underscore; everything else is
/// dropped, including `/`. Distinct paths can therefore share a key
/// (`tiles/abc` and `tiles/a!b@c` are both `tilesabc`).
pub fn sanitize_key(path: &str) -> String {
    path.chars()
        .filter(|c| c.is_alphanumeric() || KEEP_CHARS.contains(c))
        .collect()
}

/// Longest file name most filesystems accept, in bytes.
pub const MAX_KEY_BYTES: usize = 255;

/// Whether a sanitized key names a regular file inside the cache root.
///
/// `""`, `"."` and `".."` resolve to the root itself or its parent, and keys
/// over `MAX_KEY_BYTES` cannot be created as files.
pub fn is_cacheable(key: &str) -> bool {
    !matches!(key, "" | "." | "..") && key.len() <= MAX_KEY_BYTES
}

/// Path of the cache file for a sanitized key.
pub fn entry_path(root: &Path, key: &str) -> PathBuf {
    root.join(key)
}
