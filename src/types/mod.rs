//! Core types for the aggregation pipeline.

pub mod extent;
pub mod geojson;
pub mod record;
pub mod status;

pub use extent::Extent;
pub use geojson::{
    Crs, Feature, FeatureCollection, FeatureId, Geometry, LayerCollection, LayerFeatures, LayerSet, PropertyMap,
    PublishedLayers, StaticLayers,
};
pub use record::{AddressRecord, BucketRecord, DeleteCandidate, ForeignRecord, Locality, LocalityKind};
pub use status::{
    ClassifiedDiff, DiscrepancyStatus, Entries, LocationWrongRecord, NeedsDeleteRecord,
    NoRefRecord, WrongDataRecord,
};
