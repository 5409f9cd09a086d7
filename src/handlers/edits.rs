//! Tag edits on existing entries: EXISTS_BUT_WRONG_DATA and EXISTS_BUT_NO_REF.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{RunContext, StatusHandler};
use crate::error::PipelineError;
use crate::store::ShardStore;
use crate::types::{
    DiscrepancyStatus, Feature, Geometry, LayerSet, NeedsDeleteRecord, NoRefRecord, PropertyMap, WrongDataRecord,
};

/// Layer of entries whose tags disagree with the authoritative dataset.
pub const WRONG_DATA_LAYER: &str = "Wrong Address Data";

/// Layer of entries lacking the reference id tag.
pub const MISSING_REF_LAYER: &str = "Missing Reference";

/// Tag carrying the authoritative reference id.
pub const REF_TAG: &str = "ref:linz:address_id";

fn single_layer(name: &str, features: Vec<Feature>) -> LayerSet {
    if features.is_empty() {
        return LayerSet::new();
    }
    LayerSet::from([(name.to_string(), features)])
}

fn edit_properties() -> PropertyMap {
    let mut properties = PropertyMap::new();
    properties.insert("__action".to_string(), json!("edit"));
    properties
}

/// One `edit` point per record, carrying the corrected tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct WrongDataHandler;

#[async_trait]
impl StatusHandler for WrongDataHandler {
    type Record = WrongDataRecord;
    const STATUS: DiscrepancyStatus = DiscrepancyStatus::ExistsButWrongData;

    async fn handle<S: ShardStore>(
        &self,
        records: &[(String, WrongDataRecord)],
        _needs_delete: &[(String, NeedsDeleteRecord)],
        _ctx: &mut RunContext<'_, S>,
    ) -> Result<LayerSet, PipelineError> {
        let features: Vec<Feature> = records
            .iter()
            .map(|(_, record)| {
                let mut properties = edit_properties();
                for (tag, value) in &record.tags {
                    properties.insert(tag.clone(), Value::String(value.clone()));
                }
                Feature::new(record.osm_id.as_str(), Geometry::point(record.lat, record.lng), properties)
            })
            .collect();

        Ok(single_layer(WRONG_DATA_LAYER, features))
    }
}

/// One `edit` point per record, adding the reference id tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRefHandler;

#[async_trait]
impl StatusHandler for NoRefHandler {
    type Record = NoRefRecord;
    const STATUS: DiscrepancyStatus = DiscrepancyStatus::ExistsButNoRef;

    async fn handle<S: ShardStore>(
        &self,
        records: &[(String, NoRefRecord)],
        _needs_delete: &[(String, NeedsDeleteRecord)],
        _ctx: &mut RunContext<'_, S>,
    ) -> Result<LayerSet, PipelineError> {
        let features: Vec<Feature> = records
            .iter()
            .map(|(id, record)| {
                let mut properties = edit_properties();
                properties.insert(REF_TAG.to_string(), Value::String(id.clone()));
                Feature::new(record.osm_id.as_str(), Geometry::point(record.lat, record.lng), properties)
            })
            .collect();

        Ok(single_layer(MISSING_REF_LAYER, features))
    }
}
