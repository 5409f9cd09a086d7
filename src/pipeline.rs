//! End-to-end pipeline run.
//!
//! ```text
//! ClassifiedDiff → dispatch → consolidate → static layers → layers/
//!                     ↓
//!                  shards → ManifestBuilder → index.json (+ CHANGELOG.md)
//! ```
//!
//! Every artifact goes through one [`ShardStore`]. Writes are awaited one at a
//! time so the output layout is fully written before the run returns.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::canonical::{bytes_hash_hex, to_json_bytes};
use crate::changelog::{generate_markdown, ChangeCounts, CHANGELOG_FILE};
use crate::config::PipelineConfig;
use crate::consolidate::{consolidate, merge_static_layers};
use crate::dispatcher::dispatch;
use crate::error::PipelineError;
use crate::fingerprint::DiffFingerprint;
use crate::handlers::RunContext;
use crate::manifest::ManifestBuilder;
use crate::naming::LocalityNaming;
use crate::shard::slug;
use crate::store::ShardStore;
use crate::types::{ClassifiedDiff, LayerCollection, StaticLayers};

#[cfg(feature = "fs")]
use std::path::Path;
#[cfg(feature = "fs")]
use tracing::warn;

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Random id of the run, as recorded in logs.
    pub run_id: Uuid,
    /// Fingerprint of the input diff.
    pub fingerprint: DiffFingerprint,
    /// Number of locality shards written.
    pub shards: usize,
    /// Feature count per published layer.
    pub layers: BTreeMap<String, usize>,
    /// Number of manifest entries.
    pub manifest_entries: usize,
    /// xxh64 of the manifest bytes as written.
    pub manifest_hash: String,
    /// Whether a changelog was written.
    pub changelog_written: bool,
}

/// Pipeline over an artifact store.
pub struct Pipeline<S: ShardStore> {
    store: Arc<S>,
    config: PipelineConfig,
    naming: LocalityNaming,
}

impl<S: ShardStore> Pipeline<S> {
    /// Create a pipeline with the default locality naming table.
    pub fn new(store: Arc<S>, config: PipelineConfig) -> Self {
        Self {
            store,
            config,
            naming: LocalityNaming::default(),
        }
    }

    /// Replace the locality naming table.
    pub fn with_naming(mut self, naming: LocalityNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Run configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Artifact store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the pipeline over a loaded diff.
    ///
    /// `special_layers` are merged after consolidation, replacing computed
    /// layers of the same name. Any error aborts the run; artifacts already
    /// written are left in place.
    pub async fn run(
        &self,
        diff: &ClassifiedDiff,
        special_layers: Option<StaticLayers>,
    ) -> Result<RunReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "pipeline_run",
            run_id = %run_id,
            deterministic = self.config.deterministic
        );

        self.run_inner(run_id, diff, special_layers).instrument(span).await
    }

    /// Load the diff and special layers named in the configuration, then run.
    #[cfg(feature = "fs")]
    pub async fn run_from_config(&self) -> Result<RunReport, PipelineError> {
        let diff = load_diff(&self.config.diff_path).await?;
        let special = load_special_layers(self.config.special_layers_path.as_deref()).await;
        self.run(&diff, special).await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        diff: &ClassifiedDiff,
        special_layers: Option<StaticLayers>,
    ) -> Result<RunReport, PipelineError> {
        let fingerprint = DiffFingerprint::compute(diff)?;
        info!(
            diff_hash = %fingerprint.diff_hash,
            records = fingerprint.total,
            "Starting run"
        );

        self.store.prepare().await.map_err(PipelineError::from_store)?;

        let mut ctx = RunContext::new(self.store.as_ref(), &self.config, &self.naming);
        let mut layers = dispatch(diff, &mut ctx).await?;
        let shards = ctx.shards;

        consolidate(&mut layers, &self.config);
        // Only computed layers count as changes.
        let counts = ChangeCounts::from_run(&shards, &layers);

        if let Some(special) = &special_layers {
            info!(layers = special.len(), "Merging static special layers");
        }
        let layers = merge_static_layers(layers, special_layers);

        let layer_sizes: BTreeMap<String, usize> =
            layers.iter().map(|(name, features)| (name.clone(), features.len())).collect();

        for (name, features) in layers {
            let count = features.len();
            let bytes = to_json_bytes(&LayerCollection::wgs84(features), self.config.pretty_json())?;
            self.store
                .write_layer(&slug(&name), bytes)
                .await
                .map_err(PipelineError::from_store)?;
            info!(layer = %name, features = count, "Layer written");
        }

        let manifest = ManifestBuilder::new(&self.config)
            .shards(&shards)
            .special(&self.config.special_entries)
            .generated_at(Utc::now())
            .build();
        let manifest_bytes = to_json_bytes(&manifest, self.config.pretty_json())?;
        let manifest_hash = bytes_hash_hex(&manifest_bytes);
        self.store
            .write_manifest(manifest_bytes)
            .await
            .map_err(PipelineError::from_store)?;
        info!(entries = manifest.results.len(), "Manifest written");

        let changelog_written = match &self.config.release_version {
            Some(version) => {
                let markdown = generate_markdown(version, self.config.run_date, &counts)?;
                self.store
                    .write_report(CHANGELOG_FILE, markdown)
                    .await
                    .map_err(PipelineError::from_store)?;
                true
            }
            None => false,
        };

        info!(
            shards = shards.len(),
            layers = layer_sizes.len(),
            "Run complete"
        );

        Ok(RunReport {
            run_id,
            fingerprint,
            shards: shards.len(),
            layers: layer_sizes,
            manifest_entries: manifest.results.len(),
            manifest_hash,
            changelog_written,
        })
    }
}

/// Read and parse the classified diff. Both failures abort the run.
#[cfg(feature = "fs")]
pub async fn load_diff(path: &Path) -> Result<ClassifiedDiff, PipelineError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| PipelineError::DiffLoad {
        path: path.to_path_buf(),
        source,
    })?;
    ClassifiedDiff::from_json(&bytes).map_err(PipelineError::DiffParse)
}

/// Read the static special-layers document.
///
/// The document maps layer names to feature arrays. Features are kept as raw
/// JSON so any geometry, property or foreign member survives. A missing or
/// malformed document is logged and skipped.
#[cfg(feature = "fs")]
pub async fn load_special_layers(path: Option<&Path>) -> Option<StaticLayers> {
    let path = path?;

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read special layers");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(layers) => Some(layers),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse special layers");
            None
        }
    }
}
