//! Route each status's records to its handler and merge the emitted layers.

use tracing::{debug, info};

use crate::error::PipelineError;
use crate::handlers::{
    LocationWrongHandler, MultipleExistHandler, NeedsDeleteHandler, NoRefHandler, PerfectHandler, RunContext,
    StatusHandler, TotallyMissingHandler, WrongDataHandler,
};
use crate::store::ShardStore;
use crate::types::{ClassifiedDiff, DiscrepancyStatus, LayerSet, NeedsDeleteRecord};

/// Append `from` into `into`. Features under a repeated layer name are
/// appended, never overwritten.
pub fn merge_layers(into: &mut LayerSet, from: LayerSet) {
    for (name, features) in from {
        into.entry(name).or_default().extend(features);
    }
}

async fn run_handler<H: StatusHandler, S: ShardStore>(
    status: DiscrepancyStatus,
    handler: &H,
    records: &[(String, H::Record)],
    deletes: &[(String, NeedsDeleteRecord)],
    ctx: &mut RunContext<'_, S>,
) -> Result<LayerSet, PipelineError> {
    debug_assert_eq!(H::STATUS, status, "handler routed to the wrong status");
    info!(status = %H::STATUS, code = H::STATUS.code(), records = records.len(), "Handling status");

    let layers = handler.handle(records, deletes, ctx).await?;
    debug!(status = %H::STATUS, layers = layers.len(), "Handler finished");
    Ok(layers)
}

/// Run every status handler once, in status order.
///
/// Every handler also receives the NEEDS_DELETE records. The first handler
/// error aborts dispatch.
pub async fn dispatch<S: ShardStore>(
    diff: &ClassifiedDiff,
    ctx: &mut RunContext<'_, S>,
) -> Result<LayerSet, PipelineError> {
    let deletes = &diff.needs_delete;
    let mut layers = LayerSet::new();

    for status in DiscrepancyStatus::ALL {
        let emitted = match status {
            DiscrepancyStatus::Perfect => run_handler(status, &PerfectHandler, &diff.perfect, deletes, ctx).await?,
            DiscrepancyStatus::ExistsButWrongData => {
                run_handler(status, &WrongDataHandler, &diff.wrong_data, deletes, ctx).await?
            }
            DiscrepancyStatus::ExistsButNoRef => run_handler(status, &NoRefHandler, &diff.no_ref, deletes, ctx).await?,
            DiscrepancyStatus::MultipleExist => {
                run_handler(status, &MultipleExistHandler, &diff.multiple_exist, deletes, ctx).await?
            }
            DiscrepancyStatus::ExistsButLocationWrong => {
                run_handler(status, &LocationWrongHandler, &diff.location_wrong, deletes, ctx).await?
            }
            DiscrepancyStatus::TotallyMissing => {
                run_handler(status, &TotallyMissingHandler, &diff.totally_missing, deletes, ctx).await?
            }
            DiscrepancyStatus::NeedsDelete => {
                run_handler(status, &NeedsDeleteHandler, &diff.needs_delete, deletes, ctx).await?
            }
        };

        merge_layers(&mut layers, emitted);
    }

    Ok(layers)
}
