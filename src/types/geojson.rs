//! Minimal GeoJSON model for shards and layers.
//!
//! Only the geometry types the pipeline emits are modelled. Properties are
//! generic so shards carry typed address properties while layers carry
//! free-form maps. Features from static layer documents are never parsed into
//! this model; they stay raw JSON and are published as read.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Free-form feature properties.
pub type PropertyMap = serde_json::Map<String, serde_json::Value>;

/// Layer name → features. Ordered for deterministic output.
pub type LayerSet = BTreeMap<String, Vec<Feature>>;

/// Layer name → features from a static document, kept as raw JSON.
pub type StaticLayers = BTreeMap<String, Vec<serde_json::Value>>;

/// Layer name → features as published.
pub type PublishedLayers = BTreeMap<String, LayerFeatures>;

/// The features of one published layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LayerFeatures {
    /// Built by status handlers.
    Computed(Vec<Feature>),
    /// Copied from a static document without interpretation.
    Static(Vec<serde_json::Value>),
}

impl LayerFeatures {
    /// Number of features.
    pub fn len(&self) -> usize {
        match self {
            Self::Computed(features) => features.len(),
            Self::Static(features) => features.len(),
        }
    }

    /// Whether the layer has no features.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Feature collection for one published layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct LayerCollection {
    /// Explicit CRS declaration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs: Option<Crs>,
    /// Features in output order.
    pub features: LayerFeatures,
}

impl LayerCollection {
    /// Collection declared in WGS84.
    pub fn wgs84(features: LayerFeatures) -> Self {
        Self { crs: Some(Crs::wgs84()), features }
    }
}

/// Feature identifier. Static layers may carry numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    /// String id (diff ids, existing-map ids).
    Text(String),
    /// Numeric id.
    Number(i64),
}

impl From<String> for FeatureId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for FeatureId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Geometry. Positions are `[lng, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position.
    Point {
        /// `[lng, lat]`.
        coordinates: [f64; 2],
    },
    /// An ordered line of positions.
    LineString {
        /// `[[lng, lat], ...]`.
        coordinates: Vec<[f64; 2]>,
    },
    /// Rings of positions; the first is the exterior.
    Polygon {
        /// `[[[lng, lat], ...], ...]`.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
}

impl Geometry {
    /// Point geometry from latitude and longitude.
    pub fn point(lat: f64, lng: f64) -> Self {
        Self::Point { coordinates: [lng, lat] }
    }

    /// Two-position line from `(lat, lng)` to `(lat, lng)`.
    pub fn segment(from: (f64, f64), to: (f64, f64)) -> Self {
        Self::LineString {
            coordinates: vec![[from.1, from.0], [to.1, to.0]],
        }
    }
}

/// A GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature<P = PropertyMap> {
    /// Stable reference id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    /// Geometry.
    pub geometry: Geometry,
    /// Properties.
    pub properties: P,
}

impl<P> Feature<P> {
    /// Create a feature with an id.
    pub fn new(id: impl Into<FeatureId>, geometry: Geometry, properties: P) -> Self {
        Self { id: Some(id.into()), geometry, properties }
    }
}

/// Coordinate reference system declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    /// Always `name`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Named CRS.
    pub properties: CrsProperties,
}

/// Properties of a named CRS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrsProperties {
    /// CRS name, e.g. `EPSG:4326`.
    pub name: String,
}

impl Crs {
    /// WGS84 lat/lng.
    pub fn wgs84() -> Self {
        Self {
            kind: "name".to_string(),
            properties: CrsProperties { name: "EPSG:4326".to_string() },
        }
    }
}

/// A GeoJSON feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection<P = PropertyMap> {
    /// Explicit CRS declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Crs>,
    /// Features in output order.
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    /// Collection declared in WGS84.
    pub fn wgs84(features: Vec<Feature<P>>) -> Self {
        Self { crs: Some(Crs::wgs84()), features }
    }
}
