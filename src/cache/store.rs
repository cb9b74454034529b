// Cache stores for raw upstream responses.
// Maps sanitized keys to stored bodies on disk or in memory.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use crate::error::{ProxyError, Result};

use super::paths::entry_path;

/// Key-value storage for cached upstream bodies.
///
/// Keys are already sanitized. Entries are never expired or removed.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Check if an entry exists for the key.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Read an entry and parse it as JSON.
    async fn read(&self, key: &str) -> Result<Value>;

    /// Create or overwrite an entry with raw bytes.
    async fn write(&self, key: &str, body: &[u8]) -> Result<()>;
}

/// Parse stored bytes, reporting failures against the cache key.
fn parse_entry(key: &str, bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|source| ProxyError::CorruptCacheEntry {
        key: key.to_string(),
        source,
    })
}

/// Filesystem store: one file per key directly under the root directory.
#[derive(Debug, Clone)]
pub struct FsCacheStore {
    root: PathBuf,
}

impl FsCacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl CacheStore for FsCacheStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        match fs::metadata(entry_path(&self.root, key)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, key: &str) -> Result<Value> {
        let bytes = fs::read(entry_path(&self.root, key)).await?;
        parse_entry(key, &bytes)
    }

    async fn write(&self, key: &str, body: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root).await?;

        // Written in place, no temp file; concurrent writers race and the last one wins.
        fs::write(entry_path(&self.root, key), body).await?;
        Ok(())
    }
}

fn poisoned<T>(e: PoisonError<T>) -> ProxyError {
    ProxyError::Io(std::io::Error::other(e.to_string()))
}

/// In-memory store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes stored under a key.
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get_raw(key)?.is_some())
    }

    async fn read(&self, key: &str) -> Result<Value> {
        let bytes = self.get_raw(key)?.ok_or_else(|| {
            ProxyError::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("no cache entry for {key}"),
            ))
        })?;
        parse_entry(key, &bytes)
    }

    async fn write(&self, key: &str, body: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), body.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fs_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsCacheStore::new(temp_dir.path());

        assert!(!store.exists("tilesabc").await.unwrap());
        store.write("tilesabc", br#"{"foo": 1}"#).await.unwrap();
        assert!(store.exists("tilesabc").await.unwrap());

        let value = store.read("tilesabc").await.unwrap();
        assert_eq!(value, json!({ "foo": 1 }));
    }

    #[tokio::test]
    async fn test_fs_write_stores_raw_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsCacheStore::new(temp_dir.path());

        let body = "{\n  \"foo\":   1\n}";
        store.write("raw.json", body.as_bytes()).await.unwrap();

        let on_disk = std::fs::read_to_string(temp_dir.path().join("raw.json")).unwrap();
        assert_eq!(on_disk, body);
    }

    #[tokio::test]
    async fn test_fs_write_creates_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nested").join("mbcache");
        let store = FsCacheStore::new(&root);

        store.write("key", b"[]").await.unwrap();

        assert!(root.join("key").is_file());
    }

    #[tokio::test]
    async fn test_fs_overwrite_last_writer_wins() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsCacheStore::new(temp_dir.path());

        store.write("key", b"1").await.unwrap();
        store.write("key", b"2").await.unwrap();

        assert_eq!(store.read("key").await.unwrap(), json!(2));
    }

    #[tokio::test]
    async fn test_fs_corrupt_entry() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsCacheStore::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("broken"), "<html>").unwrap();

        let err = store.read("broken").await.unwrap_err();
        assert!(matches!(err, ProxyError::CorruptCacheEntry { ref key, .. } if key == "broken"));
    }

    #[tokio::test]
    async fn test_fs_directory_is_not_an_entry() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("subdir")).unwrap();
        let store = FsCacheStore::new(temp_dir.path());

        assert!(!store.exists("subdir").await.unwrap());
    }

    #[tokio::test]
    async fn test_fs_read_missing_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsCacheStore::new(temp_dir.path());

        let err = store.read("missing").await.unwrap_err();
        assert!(matches!(err, ProxyError::Io(_)));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryCacheStore::new();
        assert_eq!(store.len(), 0);

        store.write("key", br#"{"a": [1, 2]}"#).await.unwrap();

        assert!(store.exists("key").await.unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.read("key").await.unwrap(), json!({ "a": [1, 2] }));
        assert!(!store.exists("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_corrupt_entry() {
        let store = MemoryCacheStore::new();
        store.write("key", b"not json").await.unwrap();

        let err = store.read("key").await.unwrap_err();
        assert!(matches!(err, ProxyError::CorruptCacheEntry { .. }));
    }

    #[tokio::test]
    async fn test_fs_exists_reports_unexpected_errors() {
        let temp_dir = TempDir::new().unwrap();
        let not_a_dir = temp_dir.path().join("plain-file");
        std::fs::write(&not_a_dir, "x").unwrap();
        let store = FsCacheStore::new(&not_a_dir);

        assert!(store.exists("key").await.is_err());
    }

    #[tokio::test]
    async fn test_fs_exists_reports_overlong_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsCacheStore::new(temp_dir.path());

        let key = "a".repeat(300);
        assert!(store.exists(&key).await.is_err());
    }

    #[tokio::test]
    async fn test_memory_poisoned_lock_is_an_error() {
        let store = MemoryCacheStore::new();
        store.write("key", b"{}").await.unwrap();

        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.entries.write().unwrap();
            panic!("poison the lock");
        }));

        assert!(matches!(store.exists("key").await, Err(ProxyError::Io(_))));
        assert!(matches!(store.read("key").await, Err(ProxyError::Io(_))));
        assert!(store.write("key", b"{}").await.is_err());
    }
}
