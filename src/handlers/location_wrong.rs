//! EXISTS_BUT_LOCATION_WRONG: move features and a plain-text report.

use async_trait::async_trait;
use serde_json::json;

use super::{osm_link, RunContext, StatusHandler};
use crate::consolidate::COMBINED_LAYER;
use crate::error::PipelineError;
use crate::store::ShardStore;
use crate::types::{
    DiscrepancyStatus, Feature, Geometry, LayerSet, LocationWrongRecord, NeedsDeleteRecord, PropertyMap,
};

/// Report file name.
pub const LOCATION_WRONG_REPORT: &str = "location-wrong.txt";

/// Emits a two-point `move` line per misplaced node into the combined layer.
///
/// Editors can only move nodes, so ways and relations appear in the report
/// but produce no feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationWrongHandler;

fn move_feature(record: &LocationWrongRecord) -> Feature {
    let mut properties = PropertyMap::new();
    properties.insert("__action".to_string(), json!("move"));

    Feature::new(
        record.osm_id.as_str(),
        Geometry::segment((record.wrong_lat, record.wrong_lng), (record.lat, record.lng)),
        properties,
    )
}

#[async_trait]
impl StatusHandler for LocationWrongHandler {
    type Record = LocationWrongRecord;
    const STATUS: DiscrepancyStatus = DiscrepancyStatus::ExistsButLocationWrong;

    async fn handle<S: ShardStore>(
        &self,
        records: &[(String, LocationWrongRecord)],
        _needs_delete: &[(String, NeedsDeleteRecord)],
        ctx: &mut RunContext<'_, S>,
    ) -> Result<LayerSet, PipelineError> {
        let mut features = Vec::new();
        let mut report = String::new();

        for (id, record) in records {
            report.push_str(&format!(
                "{}\t\t{}\t\tneeds to move {}m to {},{}\n",
                id,
                osm_link(&ctx.config.osm_base_url, &record.osm_id),
                record.metres,
                record.lat,
                record.lng
            ));

            if record.osm_id.starts_with('n') {
                features.push(move_feature(record));
            }
        }

        ctx.write_report(LOCATION_WRONG_REPORT, report).await?;
        tracing::debug!(records = records.len(), moves = features.len(), "Location-wrong features built");

        let mut layers = LayerSet::new();
        if !features.is_empty() {
            layers.insert(COMBINED_LAYER.to_string(), features);
        }
        Ok(layers)
    }
}
