//! Discrepancy statuses and the classified diff.
//!
//! The diff document maps numeric status codes to arrays of `[id, record]`
//! pairs. Every status has its own record shape, so [`ClassifiedDiff`] keeps one
//! typed list per status rather than a map keyed by code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::record::{AddressRecord, ForeignRecord};

/// How an authoritative address differs from the existing map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscrepancyStatus {
    /// Present and correct.
    Perfect,
    /// Present, but some tags disagree.
    ExistsButWrongData,
    /// Present, but lacking the reference id tag.
    ExistsButNoRef,
    /// Present more than once.
    MultipleExist,
    /// Present, but too far from the authoritative position.
    ExistsButLocationWrong,
    /// Absent from the existing map.
    TotallyMissing,
    /// Present in the existing map, absent from the authoritative dataset.
    NeedsDelete,
}

impl DiscrepancyStatus {
    /// All statuses in processing order.
    pub const ALL: [DiscrepancyStatus; 7] = [
        Self::Perfect,
        Self::ExistsButWrongData,
        Self::ExistsButNoRef,
        Self::MultipleExist,
        Self::ExistsButLocationWrong,
        Self::TotallyMissing,
        Self::NeedsDelete,
    ];

    /// Numeric code used as the key in the diff document.
    pub fn code(&self) -> u8 {
        match self {
            Self::Perfect => 0,
            Self::ExistsButWrongData => 1,
            Self::ExistsButNoRef => 2,
            Self::MultipleExist => 3,
            Self::ExistsButLocationWrong => 4,
            Self::TotallyMissing => 5,
            Self::NeedsDelete => 6,
        }
    }

    /// Look up a status by numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl fmt::Display for DiscrepancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Perfect => write!(f, "PERFECT"),
            Self::ExistsButWrongData => write!(f, "EXISTS_BUT_WRONG_DATA"),
            Self::ExistsButNoRef => write!(f, "EXISTS_BUT_NO_REF"),
            Self::MultipleExist => write!(f, "MULTIPLE_EXIST"),
            Self::ExistsButLocationWrong => write!(f, "EXISTS_BUT_LOCATION_WRONG"),
            Self::TotallyMissing => write!(f, "TOTALLY_MISSING"),
            Self::NeedsDelete => write!(f, "NEEDS_DELETE"),
        }
    }
}

/// EXISTS_BUT_WRONG_DATA: `[osmId, lat, lng, {tag: value}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "(String, f64, f64, BTreeMap<String, String>)",
    into = "(String, f64, f64, BTreeMap<String, String>)"
)]
pub struct WrongDataRecord {
    /// Existing-map identifier.
    pub osm_id: String,
    /// Latitude of the existing entry.
    pub lat: f64,
    /// Longitude of the existing entry.
    pub lng: f64,
    /// Corrected tag values.
    pub tags: BTreeMap<String, String>,
}

impl From<(String, f64, f64, BTreeMap<String, String>)> for WrongDataRecord {
    fn from((osm_id, lat, lng, tags): (String, f64, f64, BTreeMap<String, String>)) -> Self {
        Self { osm_id, lat, lng, tags }
    }
}

impl From<WrongDataRecord> for (String, f64, f64, BTreeMap<String, String>) {
    fn from(r: WrongDataRecord) -> Self {
        (r.osm_id, r.lat, r.lng, r.tags)
    }
}

/// EXISTS_BUT_NO_REF: `[osmId, lat, lng]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64, f64)", into = "(String, f64, f64)")]
pub struct NoRefRecord {
    /// Existing-map identifier.
    pub osm_id: String,
    /// Latitude of the existing entry.
    pub lat: f64,
    /// Longitude of the existing entry.
    pub lng: f64,
}

impl From<(String, f64, f64)> for NoRefRecord {
    fn from((osm_id, lat, lng): (String, f64, f64)) -> Self {
        Self { osm_id, lat, lng }
    }
}

impl From<NoRefRecord> for (String, f64, f64) {
    fn from(r: NoRefRecord) -> Self {
        (r.osm_id, r.lat, r.lng)
    }
}

/// EXISTS_BUT_LOCATION_WRONG: `[metres, osmId, lat, lng, wrongLat, wrongLng]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "(f64, String, f64, f64, f64, f64)",
    into = "(f64, String, f64, f64, f64, f64)"
)]
pub struct LocationWrongRecord {
    /// Distance between the two positions, in metres.
    pub metres: f64,
    /// Existing-map identifier.
    pub osm_id: String,
    /// Authoritative latitude.
    pub lat: f64,
    /// Authoritative longitude.
    pub lng: f64,
    /// Latitude currently in the existing map.
    pub wrong_lat: f64,
    /// Longitude currently in the existing map.
    pub wrong_lng: f64,
}

impl From<(f64, String, f64, f64, f64, f64)> for LocationWrongRecord {
    fn from((metres, osm_id, lat, lng, wrong_lat, wrong_lng): (f64, String, f64, f64, f64, f64)) -> Self {
        Self { metres, osm_id, lat, lng, wrong_lat, wrong_lng }
    }
}

impl From<LocationWrongRecord> for (f64, String, f64, f64, f64, f64) {
    fn from(r: LocationWrongRecord) -> Self {
        (r.metres, r.osm_id, r.lat, r.lng, r.wrong_lat, r.wrong_lng)
    }
}

/// NEEDS_DELETE: `[localityName, foreignRecord]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, ForeignRecord)", into = "(String, ForeignRecord)")]
pub struct NeedsDeleteRecord {
    /// Locality bucket the deletion is filed under.
    pub locality: String,
    /// The existing entry to delete.
    pub record: ForeignRecord,
}

impl From<(String, ForeignRecord)> for NeedsDeleteRecord {
    fn from((locality, record): (String, ForeignRecord)) -> Self {
        Self { locality, record }
    }
}

impl From<NeedsDeleteRecord> for (String, ForeignRecord) {
    fn from(r: NeedsDeleteRecord) -> Self {
        (r.locality, r.record)
    }
}

/// Ordered `(id, record)` pairs for one status.
pub type Entries<T> = Vec<(String, T)>;

/// The pre-classified diff, one typed list per status.
///
/// Every status key must be present in the document; a missing key is a
/// malformed diff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedDiff {
    /// PERFECT: id → existing-map identifier.
    #[serde(rename = "0")]
    pub perfect: Entries<String>,
    /// EXISTS_BUT_WRONG_DATA.
    #[serde(rename = "1")]
    pub wrong_data: Entries<WrongDataRecord>,
    /// EXISTS_BUT_NO_REF.
    #[serde(rename = "2")]
    pub no_ref: Entries<NoRefRecord>,
    /// MULTIPLE_EXIST: id → all matching existing-map identifiers.
    #[serde(rename = "3")]
    pub multiple_exist: Entries<Vec<String>>,
    /// EXISTS_BUT_LOCATION_WRONG.
    #[serde(rename = "4")]
    pub location_wrong: Entries<LocationWrongRecord>,
    /// TOTALLY_MISSING.
    #[serde(rename = "5")]
    pub totally_missing: Entries<AddressRecord>,
    /// NEEDS_DELETE.
    #[serde(rename = "6")]
    pub needs_delete: Entries<NeedsDeleteRecord>,
}

impl ClassifiedDiff {
    /// Parse a diff document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Number of records for a status.
    pub fn count(&self, status: DiscrepancyStatus) -> usize {
        match status {
            DiscrepancyStatus::Perfect => self.perfect.len(),
            DiscrepancyStatus::ExistsButWrongData => self.wrong_data.len(),
            DiscrepancyStatus::ExistsButNoRef => self.no_ref.len(),
            DiscrepancyStatus::MultipleExist => self.multiple_exist.len(),
            DiscrepancyStatus::ExistsButLocationWrong => self.location_wrong.len(),
            DiscrepancyStatus::TotallyMissing => self.totally_missing.len(),
            DiscrepancyStatus::NeedsDelete => self.needs_delete.len(),
        }
    }

    /// Total records across all statuses.
    pub fn total(&self) -> usize {
        DiscrepancyStatus::ALL.iter().map(|s| self.count(*s)).sum()
    }
}
