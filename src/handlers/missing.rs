//! TOTALLY_MISSING: per-locality shards of addresses to create and entries to delete.

use async_trait::async_trait;
use tracing::info;

use super::{RunContext, StatusHandler};
use crate::error::PipelineError;
use crate::grouper::group_by_locality;
use crate::shard::ShardWriter;
use crate::store::ShardStore;
use crate::types::{AddressRecord, DiscrepancyStatus, LayerSet, NeedsDeleteRecord};

/// Writes one shard per locality. Emits no layers; its output reaches the
/// manifest through the shard summaries in the run context.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotallyMissingHandler;

#[async_trait]
impl StatusHandler for TotallyMissingHandler {
    type Record = AddressRecord;
    const STATUS: DiscrepancyStatus = DiscrepancyStatus::TotallyMissing;

    async fn handle<S: ShardStore>(
        &self,
        records: &[(String, AddressRecord)],
        needs_delete: &[(String, NeedsDeleteRecord)],
        ctx: &mut RunContext<'_, S>,
    ) -> Result<LayerSet, PipelineError> {
        let buckets = group_by_locality(records, needs_delete);
        info!(
            localities = buckets.len(),
            missing = records.len(),
            deletes = needs_delete.len(),
            "Writing locality shards"
        );

        let writer = ShardWriter::new(ctx.store, ctx.config, ctx.naming);
        let mut summaries = Vec::with_capacity(buckets.len());
        for (locality, entries) in &buckets {
            summaries.push(writer.write(locality, entries).await?);
        }
        ctx.shards.extend(summaries);

        Ok(LayerSet::new())
    }
}
