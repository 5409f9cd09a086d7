//! Statuses that only produce reports: PERFECT, MULTIPLE_EXIST, NEEDS_DELETE.

use async_trait::async_trait;

use super::{osm_link, RunContext, StatusHandler};
use crate::error::PipelineError;
use crate::store::ShardStore;
use crate::types::{DiscrepancyStatus, LayerSet, NeedsDeleteRecord};

/// Report file name for duplicated entries.
pub const MULTIPLE_EXIST_REPORT: &str = "multiple-exist.txt";

/// Report file name for entries to delete.
pub const NEEDS_DELETE_REPORT: &str = "needs-delete.txt";

/// Nothing to publish.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerfectHandler;

#[async_trait]
impl StatusHandler for PerfectHandler {
    type Record = String;
    const STATUS: DiscrepancyStatus = DiscrepancyStatus::Perfect;

    async fn handle<S: ShardStore>(
        &self,
        records: &[(String, String)],
        _needs_delete: &[(String, NeedsDeleteRecord)],
        _ctx: &mut RunContext<'_, S>,
    ) -> Result<LayerSet, PipelineError> {
        tracing::debug!(records = records.len(), "Perfect addresses need no action");
        Ok(LayerSet::new())
    }
}

/// Lists every duplicated address with links to each copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipleExistHandler;

#[async_trait]
impl StatusHandler for MultipleExistHandler {
    type Record = Vec<String>;
    const STATUS: DiscrepancyStatus = DiscrepancyStatus::MultipleExist;

    async fn handle<S: ShardStore>(
        &self,
        records: &[(String, Vec<String>)],
        _needs_delete: &[(String, NeedsDeleteRecord)],
        ctx: &mut RunContext<'_, S>,
    ) -> Result<LayerSet, PipelineError> {
        let report: String = records
            .iter()
            .map(|(id, osm_ids)| {
                let links: Vec<String> = osm_ids
                    .iter()
                    .map(|osm_id| osm_link(&ctx.config.osm_base_url, osm_id))
                    .collect();
                format!("{}\t\t{}\n", id, links.join(", "))
            })
            .collect();

        ctx.write_report(MULTIPLE_EXIST_REPORT, report).await?;
        Ok(LayerSet::new())
    }
}

/// Lists every entry to delete. The deletions themselves are published in
/// locality shards by the TOTALLY_MISSING handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeedsDeleteHandler;

#[async_trait]
impl StatusHandler for NeedsDeleteHandler {
    type Record = NeedsDeleteRecord;
    const STATUS: DiscrepancyStatus = DiscrepancyStatus::NeedsDelete;

    async fn handle<S: ShardStore>(
        &self,
        records: &[(String, NeedsDeleteRecord)],
        _needs_delete: &[(String, NeedsDeleteRecord)],
        ctx: &mut RunContext<'_, S>,
    ) -> Result<LayerSet, PipelineError> {
        let report: String = records
            .iter()
            .map(|(id, entry)| {
                format!(
                    "{}\t\t{}\t\t{}\n",
                    id,
                    osm_link(&ctx.config.osm_base_url, &entry.record.osm_id),
                    entry.locality
                )
            })
            .collect();

        ctx.write_report(NEEDS_DELETE_REPORT, report).await?;
        Ok(LayerSet::new())
    }
}
