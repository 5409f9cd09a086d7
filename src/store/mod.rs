//! Artifact storage backends.

pub mod memory;

#[cfg(feature = "fs")]
pub mod fs;

use async_trait::async_trait;

/// Trait for artifact storage backends.
///
/// Calls are awaited one at a time by the pipeline; implementations never see
/// two writes in flight. Writing the same artifact twice replaces it.
#[async_trait]
pub trait ShardStore: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync;

    /// Clear any previous output and recreate the layout.
    async fn prepare(&self) -> Result<(), Self::Error>;

    /// Persist a per-locality shard under its slug.
    async fn write_shard(&self, slug: &str, bytes: Vec<u8>) -> Result<(), Self::Error>;

    /// Persist a consolidated layer under its slug.
    async fn write_layer(&self, slug: &str, bytes: Vec<u8>) -> Result<(), Self::Error>;

    /// Persist the discovery manifest.
    async fn write_manifest(&self, bytes: Vec<u8>) -> Result<(), Self::Error>;

    /// Persist a plain-text report or document by file name.
    async fn write_report(&self, name: &str, text: String) -> Result<(), Self::Error>;
}

pub use memory::{InMemoryShardStore, InMemoryStoreError};

#[cfg(feature = "fs")]
pub use fs::{FsShardStore, FsStoreError};
