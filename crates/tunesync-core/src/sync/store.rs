//! Remote file store abstraction.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

/// Remote store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The server answered with a status the operation does not accept.
    #[error("{method} {path} returned HTTP {status}")]
    Status { method: String, path: String, status: u16 },

    /// Network, DNS, timeout or body read failure.
    #[error("{method} {path} failed: {message}")]
    Transport { method: String, path: String, message: String },

    /// The store cannot be built from the given configuration.
    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn status(method: &str, path: &str, status: u16) -> Self {
        Self::Status { method: method.to_string(), path: path.to_string(), status }
    }

    pub fn transport(method: &str, path: &str, message: impl ToString) -> Self {
        Self::Transport {
            method: method.to_string(),
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Opaque file store addressed by absolute paths such as `/music-app/settings.json`.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read a file. `Ok(None)` when it does not exist.
    async fn read_text(&self, path: &str) -> StoreResult<Option<String>>;

    /// Create or overwrite a file.
    async fn write_text(&self, path: &str, body: String) -> StoreResult<()>;

    /// Delete a file. Deleting a missing file succeeds.
    async fn delete(&self, path: &str) -> StoreResult<()>;

    /// Create a collection. An existing collection is not an error.
    async fn create_collection(&self, path: &str) -> StoreResult<()>;

    /// Direct children of a collection, as absolute paths. Sub-collections
    /// end with `/`.
    async fn list(&self, path: &str) -> StoreResult<Vec<String>>;
}

#[derive(Default)]
struct MemoryState {
    files: BTreeMap<String, String>,
    collections: BTreeSet<String>,
    failing_reads: HashSet<String>,
    failing_writes: HashSet<String>,
    writes: Vec<String>,
}

/// In-process store for tests and dry runs.
///
/// Individual paths can be made to fail on read or write.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, path: &str, body: impl Into<String>) {
        self.state.lock().await.files.insert(path.to_string(), body.into());
    }

    pub async fn remove(&self, path: &str) -> Option<String> {
        self.state.lock().await.files.remove(path)
    }

    pub async fn get(&self, path: &str) -> Option<String> {
        self.state.lock().await.files.get(path).cloned()
    }

    pub async fn fail_reads_from(&self, path: &str) {
        self.state.lock().await.failing_reads.insert(path.to_string());
    }

    pub async fn fail_writes_to(&self, path: &str) {
        self.state.lock().await.failing_writes.insert(path.to_string());
    }

    /// Paths successfully written, in order.
    pub async fn write_log(&self) -> Vec<String> {
        self.state.lock().await.writes.clone()
    }

    pub async fn has_collection(&self, path: &str) -> bool {
        self.state.lock().await.collections.contains(path)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn read_text(&self, path: &str) -> StoreResult<Option<String>> {
        let state = self.state.lock().await;
        if state.failing_reads.contains(path) {
            return Err(StoreError::transport("GET", path, "injected read failure"));
        }
        Ok(state.files.get(path).cloned())
    }

    async fn write_text(&self, path: &str, body: String) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if state.failing_writes.contains(path) {
            return Err(StoreError::status("PUT", path, 507));
        }
        state.files.insert(path.to_string(), body);
        state.writes.push(path.to_string());
        Ok(())
    }

    async fn delete(&self, path: &str) -> StoreResult<()> {
        self.state.lock().await.files.remove(path);
        Ok(())
    }

    async fn create_collection(&self, path: &str) -> StoreResult<()> {
        self.state.lock().await.collections.insert(path.to_string());
        Ok(())
    }

    async fn list(&self, path: &str) -> StoreResult<Vec<String>> {
        let dir = if path.ends_with('/') { path.to_string() } else { format!("{}/", path) };
        let state = self.state.lock().await;
        let mut children = BTreeSet::new();
        for file in state.files.keys() {
            let Some(rest) = file.strip_prefix(dir.as_str()) else { continue };
            match rest.split_once('/') {
                Some((sub, _)) => children.insert(format!("{}{}/", dir, sub)),
                None if !rest.is_empty() => children.insert(file.clone()),
                None => false,
            };
        }
        Ok(children.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_read_write_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.read_text("/a.json").await.unwrap(), None);

        store.write_text("/a.json", "1".to_string()).await.unwrap();
        assert_eq!(store.read_text("/a.json").await.unwrap().as_deref(), Some("1"));

        store.delete("/a.json").await.unwrap();
        store.delete("/a.json").await.unwrap();
        assert_eq!(store.read_text("/a.json").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_injected_failures() {
        let store = MemoryStore::new();
        store.fail_writes_to("/x.json").await;
        store.fail_reads_from("/y.json").await;

        let err = store.write_text("/x.json", String::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 507, .. }));
        assert!(store.read_text("/y.json").await.is_err());
        assert!(store.write_log().await.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_lists_direct_children() {
        let store = MemoryStore::new();
        store.insert("/music-app/a.json", "").await;
        store.insert("/music-app/b.json", "").await;
        store.insert("/music-app/old/c.json", "").await;
        store.insert("/other/d.json", "").await;

        let listed = store.list("/music-app").await.unwrap();
        assert_eq!(listed, vec!["/music-app/a.json", "/music-app/b.json", "/music-app/old/"]);
    }
}
