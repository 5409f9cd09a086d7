//! Discovery manifest (`index.json`) describing every published shard.
//!
//! The manifest has a fixed field schema shared by all shards and one result
//! entry per locality shard or statically declared special entry. Results are
//! sorted by name, case-insensitively, so output never depends on the order in
//! which shards were written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::config::{PipelineConfig, SpecialEntry};
use crate::shard::{slug, ShardSummary};
use crate::types::Extent;

/// One attribute in the shared field schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Property name in the shard features.
    pub name: String,
    /// Field type identifier.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Tag the property maps to.
    pub alias: String,
    /// SQL type hint.
    pub sql_type: String,
    /// Maximum value length.
    pub length: u32,
    /// Whether the value may be absent.
    pub nullable: bool,
    /// Whether editors may change the value.
    pub editable: bool,
    /// Value domain. Always null.
    pub domain: Option<serde_json::Value>,
    /// Default value. Always null.
    pub default_value: Option<serde_json::Value>,
}

impl FieldSchema {
    fn string(name: &str, alias: &str, length: u32) -> Self {
        Self::typed(name, "esriFieldTypeString", alias, length)
    }

    fn typed(name: &str, field_type: &str, alias: &str, length: u32) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            alias: alias.to_string(),
            sql_type: "sqlTypeOther".to_string(),
            length,
            nullable: true,
            editable: true,
            domain: None,
            default_value: None,
        }
    }
}

/// The field schema shared by every shard.
pub fn shard_fields() -> Vec<FieldSchema> {
    vec![
        FieldSchema::string("addr_housenumber", "addr:housenumber", 10),
        FieldSchema::string("addr_street", "addr:street", 50),
        FieldSchema::string("addr_suburb", "addr:suburb", 50),
        FieldSchema::string("addr_hamlet", "addr:hamlet", 2),
        FieldSchema::typed("ref_linz_address", "esriFieldTypeOID", "ref:linz:address_id", 10),
    ]
}

/// One published shard in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Locality or special entry name.
    pub id: String,
    /// Attribution text.
    pub license_info: String,
    /// Public shard URL.
    pub url: String,
    /// Public base address.
    #[serde(rename = "itemURL")]
    pub item_url: String,
    /// Creation time, epoch milliseconds. Omitted in deterministic mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// Modification time, epoch milliseconds. Omitted in deterministic mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<i64>,
    /// Display name embedding the count string.
    pub name: String,
    /// Same as `name`.
    pub title: String,
    /// Always `Feature Service`.
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Long description embedding the count string and run date.
    pub description: String,
    /// Same as `description`.
    pub snippet: String,
    /// Fixed tag set led by the entry name.
    pub tags: Vec<String>,
    /// Thumbnail URL.
    pub thumbnail: String,
    /// `[[minLng, minLat], [maxLng, maxLat]]`, null for an empty extent.
    pub extent: Option<[[f64; 2]; 2]>,
    /// Always empty.
    pub categories: Vec<String>,
    /// Always null.
    pub properties: Option<serde_json::Value>,
    /// Always `public`.
    pub access: String,
    /// Always -1.
    pub size: i64,
    /// Always empty.
    pub languages: Vec<String>,
    /// Always false.
    pub listed: bool,
    /// Catalogue group.
    pub group_categories: Vec<String>,
}

/// The discovery manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Field schema shared by every shard.
    pub fields: Vec<FieldSchema>,
    /// Entries sorted by name.
    pub results: Vec<ManifestEntry>,
}

#[derive(Debug, Clone)]
struct EntrySource {
    name: String,
    count: String,
    extent: Extent,
}

/// Builder for the discovery manifest.
pub struct ManifestBuilder<'a> {
    config: &'a PipelineConfig,
    sources: Vec<EntrySource>,
    generated_at: Option<DateTime<Utc>>,
}

impl<'a> ManifestBuilder<'a> {
    /// Create a builder with no entries.
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
            generated_at: None,
        }
    }

    /// Add one entry per shard summary.
    pub fn shards<'s>(mut self, summaries: impl IntoIterator<Item = &'s ShardSummary>) -> Self {
        self.sources.extend(summaries.into_iter().map(|s| EntrySource {
            name: s.locality.clone(),
            count: s.count_label(),
            extent: s.extent,
        }));
        self
    }

    /// Add statically declared entries.
    pub fn special(mut self, entries: &[SpecialEntry]) -> Self {
        self.sources.extend(entries.iter().map(|e| EntrySource {
            name: e.name.clone(),
            count: e.count.clone(),
            extent: e.extent,
        }));
        self
    }

    /// Set the wall-clock time stamped into entries. Ignored in deterministic mode.
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Build the manifest.
    pub fn build(self) -> Manifest {
        let config = self.config;
        let stamp = self
            .generated_at
            .filter(|_| config.stamps_manifest())
            .map(|at| at.timestamp_millis());
        let date = config.run_date.format("%Y-%m-%d").to_string();

        let mut results: Vec<ManifestEntry> = self
            .sources
            .into_iter()
            .map(|source| {
                let title = format!("{} Addresses ({})", source.name, source.count);
                let description = format!(
                    "{} missing address points for {} sourced from {}, last updated on {}",
                    source.count, source.name, config.source_name, date
                );

                ManifestEntry {
                    id: source.name.clone(),
                    license_info: config.license_info.clone(),
                    url: config.shard_url(&slug(&source.name)),
                    item_url: config.cdn_base_url.clone(),
                    created: stamp,
                    modified: stamp,
                    name: title.clone(),
                    title,
                    entry_type: "Feature Service".to_string(),
                    description: description.clone(),
                    snippet: description,
                    tags: vec![
                        source.name,
                        "address".to_string(),
                        "OSM".to_string(),
                        "OpenStreetMap".to_string(),
                    ],
                    thumbnail: config.thumbnail_url(),
                    extent: source.extent.bounds(),
                    categories: Vec::new(),
                    properties: None,
                    access: "public".to_string(),
                    size: -1,
                    languages: Vec::new(),
                    listed: false,
                    group_categories: vec!["/Categories/Addresses".to_string()],
                }
            })
            .collect();

        results.sort_by(|a, b| compare_names(&a.name, &b.name));

        Manifest {
            fields: shard_fields(),
            results,
        }
    }
}

fn fold_char(c: char) -> char {
    match c {
        'ā' | 'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'ē' | 'é' | 'è' | 'ê' | 'ë' => 'e',
        'ī' | 'í' | 'ì' | 'î' | 'ï' => 'i',
        'ō' | 'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ū' | 'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

fn swap_case(c: char) -> char {
    if c.is_lowercase() {
        c.to_uppercase().next().unwrap_or(c)
    } else {
        c.to_lowercase().next().unwrap_or(c)
    }
}

/// Locale-style name comparison.
///
/// Base letters decide first, ignoring case and diacritics. Ties are broken by
/// diacritics (plain before marked), then by case (lowercase first).
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let lower_a = a.to_lowercase();
    let lower_b = b.to_lowercase();

    lower_a
        .chars()
        .map(fold_char)
        .cmp(lower_b.chars().map(fold_char))
        .then_with(|| lower_a.cmp(&lower_b))
        .then_with(|| a.chars().map(swap_case).cmp(b.chars().map(swap_case)))
}
