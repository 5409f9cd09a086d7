//! Address records and the delete-candidate sum type.
//!
//! Records arrive from the classified diff and are never mutated. Backfilling a
//! locality onto a foreign record produces a new [`DeleteCandidate`] value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a locality is an urban suburb or a rural hamlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalityKind {
    /// Urban suburb, published as `addr_suburb`.
    #[serde(rename = "U")]
    Urban,
    /// Rural hamlet, published as `addr_hamlet`.
    #[serde(rename = "R")]
    Rural,
    /// No kind recorded. Publishes neither suburb nor hamlet.
    #[serde(rename = "")]
    Unspecified,
}

impl Default for LocalityKind {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl fmt::Display for LocalityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Urban => write!(f, "U"),
            Self::Rural => write!(f, "R"),
            Self::Unspecified => write!(f, ""),
        }
    }
}

/// A named locality. On the wire this is a `[kind, name]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(LocalityKind, String)", into = "(LocalityKind, String)")]
pub struct Locality {
    /// Urban or rural.
    pub kind: LocalityKind,
    /// Locality name, also the bucket key.
    pub name: String,
}

impl Locality {
    /// Create a locality.
    pub fn new(kind: LocalityKind, name: impl Into<String>) -> Self {
        Self { kind, name: name.into() }
    }

    /// Locality with no recorded kind, used when a foreign record carries none.
    pub fn unspecified(name: impl Into<String>) -> Self {
        Self::new(LocalityKind::Unspecified, name)
    }
}

impl From<(LocalityKind, String)> for Locality {
    fn from((kind, name): (LocalityKind, String)) -> Self {
        Self { kind, name }
    }
}

impl From<Locality> for (LocalityKind, String) {
    fn from(locality: Locality) -> Self {
        (locality.kind, locality.name)
    }
}

/// An authoritative address record missing from the existing map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// House number, including any unit or suffix.
    pub housenumber: String,
    /// Street name.
    pub street: String,
    /// Locality this address belongs to.
    #[serde(rename = "suburb", alias = "locality")]
    pub locality: Locality,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
}

/// An address as it exists in the crowd-sourced map.
///
/// Only the coordinates and the map identifier are guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignRecord {
    /// Existing-map identifier (`n123`, `w456`, `r789`).
    pub osm_id: String,
    /// House number, if tagged.
    #[serde(default)]
    pub housenumber: Option<String>,
    /// Street, if tagged.
    #[serde(default)]
    pub street: Option<String>,
    /// Locality, if tagged.
    #[serde(default, rename = "suburb", alias = "locality")]
    pub locality: Option<Locality>,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
}

impl ForeignRecord {
    /// Turn this record into a delete candidate filed under `bucket`.
    ///
    /// A locality already present on the record wins; otherwise the bucket name
    /// is used with an unspecified kind. The source record is left untouched.
    pub fn to_delete_candidate(&self, bucket: &str) -> DeleteCandidate {
        let locality = self
            .locality
            .clone()
            .unwrap_or_else(|| Locality::unspecified(bucket));

        DeleteCandidate {
            osm_id: self.osm_id.clone(),
            housenumber: self.housenumber.clone(),
            street: self.street.clone(),
            locality,
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// An existing map entry that should be removed.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCandidate {
    /// Existing-map identifier of the entry to delete.
    pub osm_id: String,
    /// House number, if tagged.
    pub housenumber: Option<String>,
    /// Street, if tagged.
    pub street: Option<String>,
    /// Resolved locality.
    pub locality: Locality,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
}

/// One entry in a locality bucket.
#[derive(Debug, Clone, PartialEq)]
pub enum BucketRecord {
    /// A genuine address to create.
    Address(AddressRecord),
    /// An existing entry to delete.
    DeleteCandidate(DeleteCandidate),
}

impl BucketRecord {
    /// Latitude of the record.
    pub fn lat(&self) -> f64 {
        match self {
            Self::Address(a) => a.lat,
            Self::DeleteCandidate(d) => d.lat,
        }
    }

    /// Longitude of the record.
    pub fn lng(&self) -> f64 {
        match self {
            Self::Address(a) => a.lng,
            Self::DeleteCandidate(d) => d.lng,
        }
    }

    /// Locality the record resolves to.
    pub fn locality(&self) -> &Locality {
        match self {
            Self::Address(a) => &a.locality,
            Self::DeleteCandidate(d) => &d.locality,
        }
    }

    /// House number, if known.
    pub fn housenumber(&self) -> Option<&str> {
        match self {
            Self::Address(a) => Some(a.housenumber.as_str()),
            Self::DeleteCandidate(d) => d.housenumber.as_deref(),
        }
    }

    /// Street, if known.
    pub fn street(&self) -> Option<&str> {
        match self {
            Self::Address(a) => Some(a.street.as_str()),
            Self::DeleteCandidate(d) => d.street.as_deref(),
        }
    }

    /// Whether this record represents a deletion.
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::DeleteCandidate(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_record_from_wire() {
        let json = r#"{"housenumber":"12A","street":"Queen Street","suburb":["U","Auckland Central"],"lat":-36.85,"lng":174.76}"#;
        let record: AddressRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.housenumber, "12A");
        assert_eq!(record.locality, Locality::new(LocalityKind::Urban, "Auckland Central"));
    }

    #[test]
    fn test_address_record_requires_coordinates() {
        let json = r#"{"housenumber":"1","street":"A Road","suburb":["R","Foo"],"lat":-41.0}"#;
        assert!(serde_json::from_str::<AddressRecord>(json).is_err());
    }

    #[test]
    fn test_foreign_record_defaults_locality() {
        let json = r#"{"osmId":"n42","lat":-41.2,"lng":174.7}"#;
        let record: ForeignRecord = serde_json::from_str(json).unwrap();
        let candidate = record.to_delete_candidate("Foo");

        assert_eq!(candidate.locality, Locality::unspecified("Foo"));
        assert!(record.locality.is_none(), "source record must not be patched");
    }

    #[test]
    fn test_foreign_record_keeps_own_locality() {
        let record = ForeignRecord {
            osm_id: "w7".to_string(),
            housenumber: Some("3".to_string()),
            street: None,
            locality: Some(Locality::new(LocalityKind::Rural, "Bar")),
            lat: -45.0,
            lng: 170.0,
        };

        let candidate = record.to_delete_candidate("Foo");
        assert_eq!(candidate.locality.name, "Bar");
        assert_eq!(candidate.locality.kind, LocalityKind::Rural);
    }

    #[test]
    fn test_empty_kind_parses_as_unspecified() {
        let locality: Locality = serde_json::from_str(r#"["","Somewhere"]"#).unwrap();
        assert_eq!(locality.kind, LocalityKind::Unspecified);
    }
}
