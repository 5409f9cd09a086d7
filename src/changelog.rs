//! Release changelog in markdown.
//!
//! Counts of added, updated and deleted entries per locality or layer are
//! rendered as one changelog section. A trailing HTML comment carries the
//! release version as JSON so later tooling can find it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shard::ShardSummary;
use crate::types::LayerSet;

/// File name of the rendered changelog.
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Change counts keyed by locality or layer name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    /// Entries to create.
    pub add: BTreeMap<String, u64>,
    /// Existing entries to edit.
    pub update: BTreeMap<String, u64>,
    /// Existing entries to delete.
    pub delete: BTreeMap<String, u64>,
}

impl ChangeCounts {
    /// Collect counts from the shards and layers of one run.
    ///
    /// Shards contribute creates and deletes per locality; every non-empty
    /// layer contributes its feature count as updates. Zero counts are skipped.
    pub fn from_run(shards: &[ShardSummary], layers: &LayerSet) -> Self {
        let mut counts = Self::default();

        for shard in shards {
            if shard.creates() > 0 {
                *counts.add.entry(shard.locality.clone()).or_default() += shard.creates() as u64;
            }
            if shard.deletes > 0 {
                *counts.delete.entry(shard.locality.clone()).or_default() += shard.deletes as u64;
            }
        }

        for (name, features) in layers {
            if !features.is_empty() {
                counts.update.insert(name.clone(), features.len() as u64);
            }
        }

        counts
    }
}

#[derive(Serialize)]
struct ReleaseTag<'a> {
    version: &'a str,
}

fn section(name: &str, entries: &BTreeMap<String, u64>) -> String {
    let total: u64 = entries.values().sum();
    if total == 0 {
        return String::new();
    }

    let mut sorted: Vec<(&String, &u64)> = entries.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1));

    let items: String = sorted
        .into_iter()
        .map(|(entry, count)| format!("<li>{} ({})</li>", entry, count))
        .collect();

    format!(
        "<details><summary>{} ({})</summary><ul>\n{}\n</ul></details>",
        name, total, items
    )
}

/// Render one changelog section.
pub fn generate_markdown(version: &str, date: NaiveDate, counts: &ChangeCounts) -> Result<String, serde_json::Error> {
    let tag = serde_json::to_string(&ReleaseTag { version })?;

    Ok(format!(
        "## `v{}` - {}\n\n- [ ] available to import\n\n{}\n{}\n{}\n\n<!-- DO NOT EDIT THIS COMMENT 🌏{}🌏 -->\n",
        version,
        date.format("%-d %B %Y"),
        section("Added", &counts.add),
        section("Updated", &counts.update),
        section("Deleted", &counts.delete),
        tag
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Extent;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_heading_and_marker() {
        let md = generate_markdown("1.2.0", date(), &ChangeCounts::default()).unwrap();

        assert!(md.starts_with("## `v1.2.0` - 5 March 2024\n\n- [ ] available to import\n"));
        assert!(md.ends_with("<!-- DO NOT EDIT THIS COMMENT 🌏{\"version\":\"1.2.0\"}🌏 -->\n"));
        assert!(!md.contains("<details>"));
    }

    #[test]
    fn test_sections_sorted_by_count() {
        let counts = ChangeCounts {
            add: BTreeMap::from([("Alpha".to_string(), 2), ("Beta".to_string(), 7)]),
            update: BTreeMap::new(),
            delete: BTreeMap::from([("Gamma".to_string(), 1)]),
        };
        let md = generate_markdown("3", date(), &counts).unwrap();

        assert!(md.contains("<details><summary>Added (9)</summary><ul>\n<li>Beta (7)</li><li>Alpha (2)</li>\n</ul></details>"));
        assert!(md.contains("<summary>Deleted (1)</summary>"));
        assert!(!md.contains("Updated"));
    }

    #[test]
    fn test_counts_from_run() {
        let shards = vec![
            ShardSummary {
                locality: "Foo".to_string(),
                slug: "Foo".to_string(),
                total: 4,
                deletes: 1,
                extent: Extent::new(),
            },
            ShardSummary {
                locality: "Bar".to_string(),
                slug: "Bar".to_string(),
                total: 2,
                deletes: 2,
                extent: Extent::new(),
            },
        ];
        let layers = LayerSet::from([("Empty".to_string(), Vec::new())]);

        let counts = ChangeCounts::from_run(&shards, &layers);
        assert_eq!(counts.add, BTreeMap::from([("Foo".to_string(), 3)]));
        assert_eq!(
            counts.delete,
            BTreeMap::from([("Bar".to_string(), 2), ("Foo".to_string(), 1)])
        );
        assert!(counts.update.is_empty());
    }
}
