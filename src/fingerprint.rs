//! Fingerprint of the classified diff a run was computed from.
//!
//! The fingerprint is logged at the start of every run and returned in the
//! run report, so published artifacts can be tied back to a specific input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::canonical::canonical_hash_hex;
use crate::types::{ClassifiedDiff, DiscrepancyStatus};

/// Per-status record counts plus an xxh64 hash of the whole diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffFingerprint {
    /// xxh64 of the compact JSON encoding of the diff.
    pub diff_hash: String,
    /// Record count per status, keyed by status name.
    pub counts: BTreeMap<String, usize>,
    /// Total records across every status.
    pub total: usize,
}

impl DiffFingerprint {
    /// Compute the fingerprint of a diff.
    pub fn compute(diff: &ClassifiedDiff) -> Result<Self, serde_json::Error> {
        let counts = DiscrepancyStatus::ALL
            .iter()
            .map(|status| (status.to_string(), diff.count(*status)))
            .collect();

        Ok(Self {
            diff_hash: canonical_hash_hex(diff)?,
            counts,
            total: diff.total(),
        })
    }

    /// Whether `diff` has this fingerprint.
    pub fn matches(&self, diff: &ClassifiedDiff) -> bool {
        Self::compute(diff).map(|other| &other == self).unwrap_or(false)
    }
}
