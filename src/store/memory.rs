//! In-memory artifact store for testing.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use super::ShardStore;

/// Error type for in-memory store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InMemoryStoreError {
    /// Writes were refused (simulated failure).
    #[error("Store is read-only, refused write of {0}")]
    ReadOnly(String),
}

/// In-memory artifact store for testing.
///
/// Uses BTreeMaps for deterministic iteration order.
#[derive(Debug, Default)]
pub struct InMemoryShardStore {
    shards: RwLock<BTreeMap<String, Vec<u8>>>,
    layers: RwLock<BTreeMap<String, Vec<u8>>>,
    reports: RwLock<BTreeMap<String, String>>,
    manifest: RwLock<Option<Vec<u8>>>,
    read_only: bool,
}

impl InMemoryShardStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects every write.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Get a shard by slug.
    pub fn shard(&self, slug: &str) -> Option<Vec<u8>> {
        self.shards.read().get(slug).cloned()
    }

    /// Get all shard slugs.
    pub fn shard_slugs(&self) -> Vec<String> {
        self.shards.read().keys().cloned().collect()
    }

    /// Get a layer by slug.
    pub fn layer(&self, slug: &str) -> Option<Vec<u8>> {
        self.layers.read().get(slug).cloned()
    }

    /// Get all layer slugs.
    pub fn layer_slugs(&self) -> Vec<String> {
        self.layers.read().keys().cloned().collect()
    }

    /// Get a report by file name.
    pub fn report(&self, name: &str) -> Option<String> {
        self.reports.read().get(name).cloned()
    }

    /// Get the manifest, if written.
    pub fn manifest(&self) -> Option<Vec<u8>> {
        self.manifest.read().clone()
    }

    fn check_writable(&self, what: &str) -> Result<(), InMemoryStoreError> {
        if self.read_only {
            return Err(InMemoryStoreError::ReadOnly(what.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ShardStore for InMemoryShardStore {
    type Error = InMemoryStoreError;

    async fn prepare(&self) -> Result<(), Self::Error> {
        self.check_writable("output layout")?;
        self.shards.write().clear();
        self.layers.write().clear();
        self.reports.write().clear();
        *self.manifest.write() = None;
        Ok(())
    }

    async fn write_shard(&self, slug: &str, bytes: Vec<u8>) -> Result<(), Self::Error> {
        self.check_writable(slug)?;
        self.shards.write().insert(slug.to_string(), bytes);
        Ok(())
    }

    async fn write_layer(&self, slug: &str, bytes: Vec<u8>) -> Result<(), Self::Error> {
        self.check_writable(slug)?;
        self.layers.write().insert(slug.to_string(), bytes);
        Ok(())
    }

    async fn write_manifest(&self, bytes: Vec<u8>) -> Result<(), Self::Error> {
        self.check_writable("index.json")?;
        *self.manifest.write() = Some(bytes);
        Ok(())
    }

    async fn write_report(&self, name: &str, text: String) -> Result<(), Self::Error> {
        self.check_writable(name)?;
        self.reports.write().insert(name.to_string(), text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read_back() {
        let store = InMemoryShardStore::new();
        store.write_shard("Foo", b"{}".to_vec()).await.unwrap();
        store.write_report("location-wrong.txt", "line\n".to_string()).await.unwrap();

        assert_eq!(store.shard("Foo"), Some(b"{}".to_vec()));
        assert_eq!(store.shard_slugs(), vec!["Foo".to_string()]);
        assert_eq!(store.report("location-wrong.txt").as_deref(), Some("line\n"));
        assert!(store.manifest().is_none());
    }

    #[tokio::test]
    async fn test_prepare_clears_previous_output() {
        let store = InMemoryShardStore::new();
        store.write_shard("Foo", vec![1]).await.unwrap();
        store.write_manifest(vec![2]).await.unwrap();

        store.prepare().await.unwrap();

        assert!(store.shard_slugs().is_empty());
        assert!(store.manifest().is_none());
    }

    #[tokio::test]
    async fn test_read_only_rejects_writes() {
        let store = InMemoryShardStore::read_only();
        let err = store.write_shard("Foo", vec![]).await.unwrap_err();
        assert!(err.to_string().contains("Foo"));
    }
}
