//! Filesystem artifact store.
//!
//! Layout under the output root:
//!
//! ```text
//! <root>/index.json
//! <root>/suburbs/<slug>.geo.json
//! <root>/layers/<slug>.geo.json
//! <root>/<report>
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::ShardStore;

/// Directory holding per-locality shards.
pub const SHARDS_DIR: &str = "suburbs";

/// Directory holding consolidated layers.
pub const LAYERS_DIR: &str = "layers";

/// File name of the discovery manifest.
pub const MANIFEST_FILE: &str = "index.json";

/// Error type for filesystem store.
#[derive(Debug, thiserror::Error)]
pub enum FsStoreError {
    /// I/O failure on a specific path.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being written or cleared.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Filesystem artifact store rooted at an output directory.
#[derive(Debug, Clone)]
pub struct FsShardStore {
    root: PathBuf,
}

impl FsShardStore {
    /// Create a store rooted at `root`. Nothing is touched until [`prepare`](ShardStore::prepare).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a shard file.
    pub fn shard_path(&self, slug: &str) -> PathBuf {
        self.root.join(SHARDS_DIR).join(format!("{}.geo.json", slug))
    }

    /// Path of a layer file.
    pub fn layer_path(&self, slug: &str) -> PathBuf {
        self.root.join(LAYERS_DIR).join(format!("{}.geo.json", slug))
    }

    /// Path of the manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    async fn write(&self, path: PathBuf, bytes: &[u8]) -> Result<(), FsStoreError> {
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| FsStoreError::Io { path, source })
    }
}

#[async_trait]
impl ShardStore for FsShardStore {
    type Error = FsStoreError;

    async fn prepare(&self) -> Result<(), Self::Error> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(FsStoreError::Io { path: self.root.clone(), source });
            }
        }

        for dir in [SHARDS_DIR, LAYERS_DIR] {
            let path = self.root.join(dir);
            tokio::fs::create_dir_all(&path)
                .await
                .map_err(|source| FsStoreError::Io { path, source })?;
        }

        tracing::debug!(root = %self.root.display(), "Output directory prepared");
        Ok(())
    }

    async fn write_shard(&self, slug: &str, bytes: Vec<u8>) -> Result<(), Self::Error> {
        self.write(self.shard_path(slug), &bytes).await
    }

    async fn write_layer(&self, slug: &str, bytes: Vec<u8>) -> Result<(), Self::Error> {
        self.write(self.layer_path(slug), &bytes).await
    }

    async fn write_manifest(&self, bytes: Vec<u8>) -> Result<(), Self::Error> {
        self.write(self.manifest_path(), &bytes).await
    }

    async fn write_report(&self, name: &str, text: String) -> Result<(), Self::Error> {
        self.write(self.root.join(name), text.as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prepare_creates_layout_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsShardStore::new(dir.path().join("out"));

        store.prepare().await.unwrap();
        store.write_shard("Foo", b"{}".to_vec()).await.unwrap();
        assert!(store.shard_path("Foo").exists());

        store.prepare().await.unwrap();
        assert!(!store.shard_path("Foo").exists());
        assert!(store.root().join(LAYERS_DIR).is_dir());
    }

    #[tokio::test]
    async fn test_writes_land_in_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsShardStore::new(dir.path());
        store.prepare().await.unwrap();

        store.write_manifest(b"[]".to_vec()).await.unwrap();
        store.write_layer("Address-Update", b"{}".to_vec()).await.unwrap();
        store.write_report("location-wrong.txt", "x\n".to_string()).await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("index.json")).unwrap(), b"[]");
        assert!(dir.path().join("layers/Address-Update.geo.json").exists());
        assert_eq!(std::fs::read_to_string(dir.path().join("location-wrong.txt")).unwrap(), "x\n");
    }

    #[tokio::test]
    async fn test_write_without_prepare_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsShardStore::new(dir.path().join("missing"));

        let err = store.write_shard("Foo", vec![]).await.unwrap_err();
        assert!(err.to_string().contains("Foo.geo.json"));
    }
}
