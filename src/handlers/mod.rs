//! Per-status handlers.
//!
//! Each [`DiscrepancyStatus`] has exactly one handler. Handlers receive their
//! own records plus the NEEDS_DELETE records, may write shards and reports
//! through the run context, and return the layers they emit.

pub mod edits;
pub mod location_wrong;
pub mod missing;
pub mod reports;

use async_trait::async_trait;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::naming::LocalityNaming;
use crate::shard::ShardSummary;
use crate::store::ShardStore;
use crate::types::{DiscrepancyStatus, LayerSet, NeedsDeleteRecord};

pub use edits::{NoRefHandler, WrongDataHandler, MISSING_REF_LAYER, WRONG_DATA_LAYER};
pub use location_wrong::{LocationWrongHandler, LOCATION_WRONG_REPORT};
pub use missing::TotallyMissingHandler;
pub use reports::{MultipleExistHandler, NeedsDeleteHandler, PerfectHandler, MULTIPLE_EXIST_REPORT, NEEDS_DELETE_REPORT};

/// State shared by handlers for the duration of one run.
pub struct RunContext<'a, S: ShardStore> {
    /// Artifact store.
    pub store: &'a S,
    /// Run configuration.
    pub config: &'a PipelineConfig,
    /// Locality naming corrections.
    pub naming: &'a LocalityNaming,
    /// Summaries of every shard written so far, in write order.
    pub shards: Vec<ShardSummary>,
}

impl<'a, S: ShardStore> RunContext<'a, S> {
    /// Create a context with no shards written.
    pub fn new(store: &'a S, config: &'a PipelineConfig, naming: &'a LocalityNaming) -> Self {
        Self {
            store,
            config,
            naming,
            shards: Vec::new(),
        }
    }

    /// Persist a plain-text report.
    pub async fn write_report(&self, name: &str, text: String) -> Result<(), PipelineError> {
        self.store
            .write_report(name, text)
            .await
            .map_err(PipelineError::from_store)
    }
}

/// Handler for one discrepancy status.
#[async_trait]
pub trait StatusHandler: Send + Sync {
    /// Record shape for this status.
    type Record: Send + Sync;

    /// The status this handler processes.
    const STATUS: DiscrepancyStatus;

    /// Process all records of this status.
    async fn handle<S: ShardStore>(
        &self,
        records: &[(String, Self::Record)],
        needs_delete: &[(String, NeedsDeleteRecord)],
        ctx: &mut RunContext<'_, S>,
    ) -> Result<LayerSet, PipelineError>;
}

/// Link to an existing-map object from its prefixed id (`n1`, `w2`, `r3`).
pub fn osm_link(base: &str, osm_id: &str) -> String {
    let base = base.trim_end_matches('/');
    let kind = match osm_id.chars().next() {
        Some('n') => "node",
        Some('w') => "way",
        Some('r') => "relation",
        _ => return format!("{}/{}", base, osm_id),
    };
    format!("{}/{}/{}", base, kind, &osm_id[1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osm_link() {
        assert_eq!(osm_link("https://osm.org", "n123"), "https://osm.org/node/123");
        assert_eq!(osm_link("https://osm.org/", "w5"), "https://osm.org/way/5");
        assert_eq!(osm_link("https://osm.org", "r9"), "https://osm.org/relation/9");
        assert_eq!(osm_link("https://osm.org", "x1"), "https://osm.org/x1");
    }
}
