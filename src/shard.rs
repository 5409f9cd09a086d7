//! Per-locality shard building and persistence.
//!
//! A shard is one GeoJSON point collection per locality bucket. Building a
//! shard also yields the summary the manifest is made from.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::canonical::to_json_bytes;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::naming::LocalityNaming;
use crate::store::ShardStore;
use crate::types::{BucketRecord, Extent, Feature, FeatureCollection, Geometry, LocalityKind};

/// Id prefix marking a feature as a deletion rather than a new address.
pub const DELETE_ID_PREFIX: &str = "SPECIAL_DELETE_";

/// Filesystem-safe slug: runs of `/` or space collapse to a single `-`.
pub fn slug(name: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let re = SEPARATORS.get_or_init(|| Regex::new(r"(/| )+").expect("slug pattern is valid"));
    re.replace_all(name, "-").into_owned()
}

/// Published id for a bucket entry.
pub fn published_id(id: &str, record: &BucketRecord) -> String {
    if record.is_delete() {
        format!("{}{}", DELETE_ID_PREFIX, id)
    } else {
        id.to_string()
    }
}

/// Properties of a shard feature. Absent values are omitted from the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressProperties {
    /// `addr:housenumber`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr_housenumber: Option<String>,
    /// `addr:street`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr_street: Option<String>,
    /// `addr:suburb`, urban localities only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr_suburb: Option<String>,
    /// `addr:hamlet`, rural localities only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr_hamlet: Option<String>,
    /// Reference id, prefixed for deletions.
    pub ref_linz_address: String,
}

/// A built shard.
pub type Shard = FeatureCollection<AddressProperties>;

/// Summary of one written shard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardSummary {
    /// Locality name (bucket key).
    pub locality: String,
    /// Filename slug.
    pub slug: String,
    /// Number of features.
    pub total: usize,
    /// Number of delete features.
    pub deletes: usize,
    /// Extent of all features.
    pub extent: Extent,
}

impl ShardSummary {
    /// Number of create features.
    pub fn creates(&self) -> usize {
        self.total - self.deletes
    }

    /// `"<total> (+<creates> -<deletes>)"`.
    pub fn count_label(&self) -> String {
        format!("{} (+{} -{})", self.total, self.creates(), self.deletes)
    }
}

/// Build the shard for one locality bucket.
pub fn build_shard(
    locality: &str,
    records: &[(String, BucketRecord)],
    naming: &LocalityNaming,
) -> (Shard, ShardSummary) {
    let mut extent = Extent::new();
    let mut deletes = 0;

    let features = records
        .iter()
        .map(|(id, record)| {
            extent.visit(record.lat(), record.lng());
            if record.is_delete() {
                deletes += 1;
            }

            let reference = published_id(id, record);
            let place = record.locality();
            let place_name = naming.published_name(&place.name).to_string();
            let kind = naming.published_kind(place);

            let properties = AddressProperties {
                addr_housenumber: record.housenumber().map(str::to_string),
                addr_street: record.street().map(str::to_string),
                addr_suburb: (kind == LocalityKind::Urban).then(|| place_name.clone()),
                addr_hamlet: (kind == LocalityKind::Rural).then(|| place_name.clone()),
                ref_linz_address: reference.clone(),
            };

            Feature::new(reference, Geometry::point(record.lat(), record.lng()), properties)
        })
        .collect();

    let summary = ShardSummary {
        locality: locality.to_string(),
        slug: slug(locality),
        total: records.len(),
        deletes,
        extent,
    };

    (FeatureCollection::wgs84(features), summary)
}

/// Builds shards and persists them through a store.
pub struct ShardWriter<'a, S: ShardStore> {
    store: &'a S,
    config: &'a PipelineConfig,
    naming: &'a LocalityNaming,
}

impl<'a, S: ShardStore> ShardWriter<'a, S> {
    /// Create a writer.
    pub fn new(store: &'a S, config: &'a PipelineConfig, naming: &'a LocalityNaming) -> Self {
        Self { store, config, naming }
    }

    /// Build, encode, and persist one shard.
    pub async fn write(
        &self,
        locality: &str,
        records: &[(String, BucketRecord)],
    ) -> Result<ShardSummary, PipelineError> {
        let (shard, summary) = build_shard(locality, records, self.naming);
        let bytes = to_json_bytes(&shard, self.config.pretty_json())?;

        self.store
            .write_shard(&summary.slug, bytes)
            .await
            .map_err(PipelineError::from_store)?;

        tracing::debug!(
            locality = %locality,
            slug = %summary.slug,
            total = summary.total,
            deletes = summary.deletes,
            "Shard written"
        );

        Ok(summary)
    }
}
