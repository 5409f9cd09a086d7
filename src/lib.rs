//! # address-shards
//!
//! Status-driven aggregation of address discrepancies into per-locality
//! GeoJSON shards, consolidated edit layers, and a discovery manifest.
//!
//! The pipeline answers one question:
//!
//! > Given a classified diff between an authoritative address dataset and the
//! > existing map, what does a mapper need to add, edit, or delete, per place?
//!
//! ## Architecture
//!
//! ```text
//! ClassifiedDiff → StatusHandler (per status) → LayerSet → consolidate
//!                        ↓
//!              group_by_locality → ShardWriter → ShardStore
//!                        ↓
//!                 ShardSummary → ManifestBuilder → index.json
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Buckets and layer sets are BTreeMaps; iteration order never depends on hashing
//! - Manifest entries are sorted by name, so shard write order never leaks into output
//! - In deterministic mode, output carries no wall-clock timestamps and no
//!   input-size-dependent consolidation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod changelog;
pub mod config;
pub mod consolidate;
pub mod dispatcher;
pub mod error;
pub mod fingerprint;
pub mod grouper;
pub mod handlers;
pub mod manifest;
pub mod naming;
pub mod pipeline;
pub mod shard;
pub mod store;
pub mod types;

// Re-exports
pub use types::{
    AddressRecord, BucketRecord, ClassifiedDiff, DeleteCandidate, DiscrepancyStatus, Extent, Feature,
    FeatureCollection, FeatureId, ForeignRecord, Geometry, LayerCollection, LayerFeatures, LayerSet, Locality,
    LocalityKind, PropertyMap, PublishedLayers, StaticLayers,
};
pub use canonical::{bytes_hash_hex, canonical_hash_hex, to_json_bytes};
pub use changelog::{generate_markdown, ChangeCounts};
pub use config::{PipelineConfig, SpecialEntry};
pub use consolidate::{consolidate, COMBINED_LAYER, CONSOLIDATION_THRESHOLD};
pub use dispatcher::dispatch;
pub use error::{ConfigError, PipelineError};
pub use fingerprint::DiffFingerprint;
pub use grouper::{group_by_locality, LocalityBuckets};
pub use handlers::{RunContext, StatusHandler};
pub use manifest::{Manifest, ManifestBuilder, ManifestEntry};
pub use naming::LocalityNaming;
pub use pipeline::{Pipeline, RunReport};
#[cfg(feature = "fs")]
pub use pipeline::{load_diff, load_special_layers};
pub use shard::{build_shard, slug, ShardSummary, ShardWriter, DELETE_ID_PREFIX};
pub use store::{InMemoryShardStore, ShardStore};
#[cfg(feature = "fs")]
pub use store::FsShardStore;
