//! Run configuration.
//!
//! A [`PipelineConfig`] is built once and passed by reference to every stage.
//! Nothing in the pipeline reads the environment directly.
//!
//! ## Environment
//!
//! - `MOCK` / `DETERMINISTIC`: reference mode (`1`, `true`, `yes`)
//! - `CDN_URL`: public base address of the published shards
//! - `OSM_URL`: base address for links to existing-map objects
//! - `OUTPUT_DIR`, `DIFF_PATH`, `SPECIAL_LAYERS_PATH`: file locations
//! - `RUN_DATE`: date embedded in descriptions (`YYYY-MM-DD`, default today)
//! - `RELEASE_VERSION`: when set, a changelog is written

use chrono::{NaiveDate, Utc};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::types::Extent;

/// Default public base address of the shard collection.
pub const DEFAULT_CDN_URL: &str = "https://addresses.example.org";

/// Default base address for existing-map object links.
pub const DEFAULT_OSM_URL: &str = "https://osm.org";

/// Default attribution text for every manifest entry.
pub const DEFAULT_LICENSE_INFO: &str = "See https://wiki.openstreetmap.org/wiki/Contributors#LINZ";

/// A manifest entry declared statically rather than computed from shards.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialEntry {
    /// Entry name; also the shard slug source.
    pub name: String,
    /// Published extent.
    pub extent: Extent,
    /// Pre-formatted count string.
    pub count: String,
}

impl SpecialEntry {
    /// The catch-all entry for location-wrong edits, covering the whole country.
    pub fn location_wrong() -> Self {
        Self {
            name: "ZZ Special Location Wrong".to_string(),
            extent: Extent::from_bounds(-48.026701, 165.019045, -32.932388, 184.227542),
            count: "N/A".to_string(),
        }
    }
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Reference mode: pretty JSON, no wall-clock timestamps, no consolidation.
    pub deterministic: bool,
    /// Public base address of the shard collection.
    pub cdn_base_url: String,
    /// Base address for existing-map object links in reports.
    pub osm_base_url: String,
    /// Root of the published output.
    pub output_dir: PathBuf,
    /// Classified diff document.
    pub diff_path: PathBuf,
    /// Optional static special-layers document.
    pub special_layers_path: Option<PathBuf>,
    /// Date embedded in manifest descriptions.
    pub run_date: NaiveDate,
    /// Name of the authoritative dataset, used in descriptions.
    pub source_name: String,
    /// Attribution text for every manifest entry.
    pub license_info: String,
    /// Release version for the changelog, if one should be written.
    pub release_version: Option<String>,
    /// Manifest entries that are not backed by computed shards.
    pub special_entries: Vec<SpecialEntry>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            deterministic: false,
            cdn_base_url: DEFAULT_CDN_URL.to_string(),
            osm_base_url: DEFAULT_OSM_URL.to_string(),
            output_dir: PathBuf::from("out"),
            diff_path: PathBuf::from("data/status.json"),
            special_layers_path: Some(PathBuf::from("data/special-layers.geo.json")),
            run_date: Utc::now().date_naive(),
            source_name: "LINZ".to_string(),
            license_info: DEFAULT_LICENSE_INFO.to_string(),
            release_version: None,
            special_entries: vec![SpecialEntry::location_wrong()],
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.deterministic = env_flag("MOCK") || env_flag("DETERMINISTIC");
        if let Ok(url) = std::env::var("CDN_URL") {
            config.cdn_base_url = url;
        }
        if let Ok(url) = std::env::var("OSM_URL") {
            config.osm_base_url = url;
        }
        if let Ok(dir) = std::env::var("OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("DIFF_PATH") {
            config.diff_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("SPECIAL_LAYERS_PATH") {
            config.special_layers_path = if path.is_empty() { None } else { Some(PathBuf::from(path)) };
        }
        if let Some(date) = std::env::var("RUN_DATE").ok().and_then(|s| parse_run_date(&s).ok()) {
            config.run_date = date;
        }
        config.release_version = std::env::var("RELEASE_VERSION").ok().filter(|v| !v.is_empty());

        config
    }

    /// Like [`from_env`](Self::from_env), but rejects an invalid `RUN_DATE`.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        if let Ok(raw) = std::env::var("RUN_DATE") {
            parse_run_date(&raw)?;
        }
        Ok(Self::from_env())
    }

    /// Set reference mode.
    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Set the public base address.
    pub fn with_cdn_base_url(mut self, url: impl Into<String>) -> Self {
        self.cdn_base_url = url.into();
        self
    }

    /// Set the output root.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the diff document path.
    pub fn with_diff_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.diff_path = path.into();
        self
    }

    /// Set or clear the special-layers document path.
    pub fn with_special_layers_path(mut self, path: Option<PathBuf>) -> Self {
        self.special_layers_path = path;
        self
    }

    /// Pin the description date.
    pub fn with_run_date(mut self, date: NaiveDate) -> Self {
        self.run_date = date;
        self
    }

    /// Set the changelog release version.
    pub fn with_release_version(mut self, version: impl Into<String>) -> Self {
        self.release_version = Some(version.into());
        self
    }

    /// Replace the statically declared manifest entries.
    pub fn with_special_entries(mut self, entries: Vec<SpecialEntry>) -> Self {
        self.special_entries = entries;
        self
    }

    /// Whether consolidation of small layers is enabled.
    pub fn consolidates(&self) -> bool {
        !self.deterministic
    }

    /// Whether emitted JSON is pretty-printed.
    pub fn pretty_json(&self) -> bool {
        self.deterministic
    }

    /// Whether wall-clock timestamps are written into the manifest.
    pub fn stamps_manifest(&self) -> bool {
        !self.deterministic
    }

    /// The public URL of a shard.
    pub fn shard_url(&self, slug: &str) -> String {
        format!("{}/suburbs/{}.geo.json", self.cdn_base_url.trim_end_matches('/'), slug)
    }

    /// The public URL of the thumbnail image.
    pub fn thumbnail_url(&self) -> String {
        format!("{}/thumbnail.png", self.cdn_base_url.trim_end_matches('/'))
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn parse_run_date(raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ConfigError::InvalidRunDate(raw.to_string()))
}
