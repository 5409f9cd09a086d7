//! Bounding box accumulation over point coordinates.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in WGS84 degrees.
///
/// Starts as the empty sentinel `{+inf, +inf, -inf, -inf}`. An extent that has
/// never visited a point must not be published as a real bbox; use
/// [`Extent::bounds`] which returns `None` in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extent {
    /// Southern edge.
    pub min_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

impl Extent {
    /// The empty extent.
    pub const EMPTY: Extent = Extent {
        min_lat: f64::INFINITY,
        min_lng: f64::INFINITY,
        max_lat: f64::NEG_INFINITY,
        max_lng: f64::NEG_INFINITY,
    };

    /// Create an empty extent.
    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Create an extent from explicit bounds.
    pub fn from_bounds(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self { min_lat, min_lng, max_lat, max_lng }
    }

    /// Grow the extent to include a point.
    pub fn visit(&mut self, lat: f64, lng: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.min_lng = self.min_lng.min(lng);
        self.max_lat = self.max_lat.max(lat);
        self.max_lng = self.max_lng.max(lng);
    }

    /// True until at least one point has been visited.
    pub fn is_empty(&self) -> bool {
        self.min_lat > self.max_lat || self.min_lng > self.max_lng
    }

    /// Corners as `[[minLng, minLat], [maxLng, maxLat]]`, or `None` when empty.
    pub fn bounds(&self) -> Option<[[f64; 2]; 2]> {
        if self.is_empty() {
            return None;
        }
        Some([[self.min_lng, self.min_lat], [self.max_lng, self.max_lat]])
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::EMPTY
    }
}
