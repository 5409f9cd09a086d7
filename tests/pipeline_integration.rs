//! End-to-end pipeline tests against the in-memory and filesystem stores.

use std::sync::Arc;

use address_shards::handlers::{LOCATION_WRONG_REPORT, MULTIPLE_EXIST_REPORT, NEEDS_DELETE_REPORT, WRONG_DATA_LAYER};
use address_shards::{
    ClassifiedDiff, InMemoryShardStore, LocalityNaming, Pipeline, PipelineConfig, PipelineError, SpecialEntry,
    COMBINED_LAYER,
};
use chrono::NaiveDate;
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

const DIFF: &str = r#"{
    "0": [["100", "n100"]],
    "1": [
        ["101", ["n101", -41.01, 174.01, {"addr:street": "Main Road"}]],
        ["102", ["n102", -41.02, 174.02, {"addr:housenumber": "3A"}]]
    ],
    "2": [["103", ["w103", -41.03, 174.03]]],
    "3": [["104", ["n104", "w105"]]],
    "4": [
        ["106", [25, "n106", -41.06, 174.06, -41.07, 174.07]],
        ["107", [40, "w107", -41.08, 174.08, -41.09, 174.09]]
    ],
    "5": [
        ["1", {"housenumber": "1", "street": "Kauri Road", "suburb": ["R", "North/South Hamlet"], "lat": -41.5, "lng": 174.5}],
        ["2", {"housenumber": "12", "street": "Beach Road", "suburb": ["U", "Orewa"], "lat": -36.6, "lng": 174.7}],
        ["3", {"housenumber": "14", "street": "Beach Road", "suburb": ["U", "Orewa"], "lat": -36.5, "lng": 174.6}]
    ],
    "6": [
        ["7", ["North/South Hamlet", {"osmId": "n7", "housenumber": "9", "lat": -41.6, "lng": 174.4}]],
        ["8", ["Ghost Town", {"osmId": "n8", "lat": -40.0, "lng": 175.0}]]
    ]
}"#;

fn diff() -> ClassifiedDiff {
    ClassifiedDiff::from_json(DIFF.as_bytes()).unwrap()
}

fn config() -> PipelineConfig {
    PipelineConfig::default()
        .with_deterministic(true)
        .with_cdn_base_url("https://cdn.example.org")
        .with_run_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
}

fn json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

async fn run_in_memory(config: PipelineConfig) -> Arc<InMemoryShardStore> {
    let store = Arc::new(InMemoryShardStore::new());
    Pipeline::new(store.clone(), config).run(&diff(), None).await.unwrap();
    store
}

// ─────────────────────────────────────────────────────────────────────────────
// Shards
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_one_shard_per_locality() {
    let store = run_in_memory(config()).await;

    assert_eq!(
        store.shard_slugs(),
        vec!["Ghost-Town".to_string(), "North-South-Hamlet".to_string(), "Orewa".to_string()]
    );
}

#[tokio::test]
async fn test_deletes_follow_creates_with_prefix() {
    let store = run_in_memory(config()).await;
    let shard = json(&store.shard("North-South-Hamlet").unwrap());
    let features = shard["features"].as_array().unwrap();

    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["id"], "1");
    assert_eq!(features[0]["properties"]["addr_hamlet"], "North/South Hamlet");
    assert!(features[0]["properties"].get("addr_suburb").is_none());

    assert_eq!(features[1]["id"], "SPECIAL_DELETE_7");
    assert_eq!(features[1]["properties"]["ref_linz_address"], "SPECIAL_DELETE_7");
    assert_eq!(features[1]["properties"]["addr_housenumber"], "9");
    assert!(features[1]["properties"].get("addr_street").is_none());
}

#[tokio::test]
async fn test_naming_applies_to_properties_only() {
    let store = run_in_memory(config()).await;
    let shard = json(&store.shard("Orewa").unwrap());

    assert_eq!(shard["features"][0]["properties"]["addr_suburb"], "Ōrewa");
    assert_eq!(shard["crs"]["properties"]["name"], "EPSG:4326");
}

#[tokio::test]
async fn test_identity_naming_publishes_source_names() {
    let store = Arc::new(InMemoryShardStore::new());
    Pipeline::new(store.clone(), config())
        .with_naming(LocalityNaming::identity())
        .run(&diff(), None)
        .await
        .unwrap();

    let shard = json(&store.shard("Orewa").unwrap());
    assert_eq!(shard["features"][0]["properties"]["addr_suburb"], "Orewa");
}

// ─────────────────────────────────────────────────────────────────────────────
// Manifest
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_manifest_entries_and_counts() {
    let store = run_in_memory(config()).await;
    let manifest = json(&store.manifest().unwrap());
    let results = manifest["results"].as_array().unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["Ghost Town", "North/South Hamlet", "Orewa", "ZZ Special Location Wrong"]);

    let hamlet = &results[1];
    assert_eq!(hamlet["name"], "North/South Hamlet Addresses (2 (+1 -1))");
    assert_eq!(hamlet["url"], "https://cdn.example.org/suburbs/North-South-Hamlet.geo.json");
    assert_eq!(hamlet["extent"], serde_json::json!([[174.4, -41.6], [174.5, -41.5]]));
    assert!(hamlet.get("created").is_none());

    assert_eq!(results[0]["name"], "Ghost Town Addresses (1 (+0 -1))");
    assert_eq!(results[3]["name"], "ZZ Special Location Wrong Addresses (N/A)");
    assert_eq!(manifest["fields"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_manifest_stamped_outside_deterministic_mode() {
    let store = run_in_memory(config().with_deterministic(false)).await;
    let manifest = json(&store.manifest().unwrap());

    for entry in manifest["results"].as_array().unwrap() {
        assert!(entry["created"].is_i64());
        assert_eq!(entry["created"], entry["modified"]);
    }
}

#[tokio::test]
async fn test_special_entries_configurable() {
    let config = config().with_special_entries(vec![SpecialEntry {
        name: "aa first".to_string(),
        extent: address_shards::Extent::new(),
        count: "N/A".to_string(),
    }]);
    let store = run_in_memory(config).await;
    let manifest = json(&store.manifest().unwrap());

    assert_eq!(manifest["results"][0]["id"], "aa first");
    assert!(manifest["results"][0]["extent"].is_null());
    assert_eq!(manifest["results"].as_array().unwrap().len(), 4);
}

// ─────────────────────────────────────────────────────────────────────────────
// Layers and Reports
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_deterministic_layers_are_not_consolidated() {
    let store = run_in_memory(config()).await;

    assert_eq!(
        store.layer_slugs(),
        vec!["Address-Update".to_string(), "Missing-Reference".to_string(), "Wrong-Address-Data".to_string()]
    );

    let moves = json(&store.layer("Address-Update").unwrap());
    let features = moves["features"].as_array().unwrap();
    assert_eq!(features.len(), 1, "only node ids get a move feature");
    assert_eq!(features[0]["id"], "n106");
    assert_eq!(features[0]["geometry"]["type"], "LineString");
}

#[tokio::test]
async fn test_small_layers_fold_into_combined() {
    let store = Arc::new(InMemoryShardStore::new());
    let report = Pipeline::new(store.clone(), config().with_deterministic(false))
        .run(&diff(), None)
        .await
        .unwrap();

    assert_eq!(store.layer_slugs(), vec!["Address-Update".to_string()]);
    assert_eq!(report.layers.get(COMBINED_LAYER), Some(&4));
    assert!(!report.layers.contains_key(WRONG_DATA_LAYER));
}

#[tokio::test]
async fn test_reports_written() {
    let store = run_in_memory(config()).await;

    let location = store.report(LOCATION_WRONG_REPORT).unwrap();
    assert_eq!(location.lines().count(), 2);
    assert!(location.starts_with("106\t\thttps://osm.org/node/106\t\tneeds to move 25m to -41.06,174.06\n"));

    assert_eq!(
        store.report(MULTIPLE_EXIST_REPORT).unwrap(),
        "104\t\thttps://osm.org/node/104, https://osm.org/way/105\n"
    );
    assert!(store.report(NEEDS_DELETE_REPORT).unwrap().contains("8\t\thttps://osm.org/node/8\t\tGhost Town"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Run Report and Errors
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_run_report_counts() {
    let store = Arc::new(InMemoryShardStore::new());
    let report = Pipeline::new(store, config()).run(&diff(), None).await.unwrap();

    assert_eq!(report.shards, 3);
    assert_eq!(report.manifest_entries, 4);
    assert_eq!(report.fingerprint.total, 12);
    assert_eq!(report.fingerprint.counts["NEEDS_DELETE"], 2);
    assert!(!report.changelog_written);
}

#[test]
fn test_diff_missing_status_key_is_malformed() {
    let result = ClassifiedDiff::from_json(br#"{"0": [], "1": [], "2": [], "3": [], "4": [], "5": []}"#);
    assert!(result.is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Filesystem Store
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "fs")]
#[tokio::test]
async fn test_filesystem_run_from_config() {
    use address_shards::FsShardStore;

    let dir = tempfile::tempdir().unwrap();
    let diff_path = dir.path().join("status.json");
    let special_path = dir.path().join("special-layers.geo.json");
    let out = dir.path().join("out");

    tokio::fs::write(&diff_path, DIFF).await.unwrap();
    tokio::fs::write(
        &special_path,
        r#"{"Special Area": [{"type": "Feature", "id": "s1", "geometry": {"type": "Point", "coordinates": [174.0, -41.0]}, "properties": {}}]}"#,
    )
    .await
    .unwrap();

    let config = config()
        .with_diff_path(&diff_path)
        .with_special_layers_path(Some(special_path))
        .with_output_dir(&out)
        .with_release_version("2.0.0");
    let store = Arc::new(FsShardStore::new(out.clone()));
    let report = Pipeline::new(store, config).run_from_config().await.unwrap();

    assert!(out.join("index.json").is_file());
    assert!(out.join("suburbs/North-South-Hamlet.geo.json").is_file());
    assert!(out.join("layers/Special-Area.geo.json").is_file());
    assert!(out.join(LOCATION_WRONG_REPORT).is_file());
    assert_eq!(report.layers.get("Special Area"), Some(&1));

    let changelog = tokio::fs::read_to_string(out.join("CHANGELOG.md")).await.unwrap();
    assert!(changelog.starts_with("## `v2.0.0` - 1 June 2024"));
    assert!(changelog.contains("<summary>Added (3)</summary>"));
    assert!(changelog.contains("<summary>Deleted (2)</summary>"));
    assert!(!changelog.contains("Special Area"));

    let manifest = tokio::fs::read_to_string(out.join("index.json")).await.unwrap();
    assert!(manifest.starts_with("{\n  \"fields\""), "deterministic output is pretty-printed");
}

#[cfg(feature = "fs")]
#[tokio::test]
async fn test_filesystem_special_layers_published_verbatim() {
    use address_shards::FsShardStore;

    let dir = tempfile::tempdir().unwrap();
    let diff_path = dir.path().join("status.json");
    let special_path = dir.path().join("special-layers.geo.json");
    let out = dir.path().join("out");

    let features = serde_json::json!([
        {
            "type": "Feature",
            "id": 1,
            "geometry": {"type": "MultiPolygon", "coordinates": [[[[166.0, -46.0], [167.0, -46.0], [167.0, -47.0], [166.0, -46.0]]]]},
            "properties": {"name": "Rakiura"}
        },
        {
            "type": "Feature",
            "geometry": {"type": "MultiPoint", "coordinates": [[174.0, -41.0], [175.0, -40.0]]},
            "properties": null
        },
        {
            "type": "Feature",
            "title": "foreign member",
            "bbox": [172.0, -44.0, 173.0, -43.0],
            "geometry": {"type": "Point", "coordinates": [172.5, -43.5]},
            "properties": {"nested": {"a": [1, 2]}}
        }
    ]);
    let document = serde_json::json!({ "Outer Islands": features.clone() });

    tokio::fs::write(&diff_path, DIFF).await.unwrap();
    tokio::fs::write(&special_path, serde_json::to_vec(&document).unwrap()).await.unwrap();

    let config = config()
        .with_diff_path(&diff_path)
        .with_special_layers_path(Some(special_path))
        .with_output_dir(&out);
    let report = Pipeline::new(Arc::new(FsShardStore::new(out.clone())), config)
        .run_from_config()
        .await
        .unwrap();

    assert_eq!(report.layers.get("Outer Islands"), Some(&3));

    let layer = json(&tokio::fs::read(out.join("layers/Outer-Islands.geo.json")).await.unwrap());
    assert_eq!(layer["type"], "FeatureCollection");
    assert_eq!(layer["features"], features);
}

#[cfg(feature = "fs")]
#[tokio::test]
async fn test_filesystem_malformed_diff_aborts() {
    use address_shards::FsShardStore;

    let dir = tempfile::tempdir().unwrap();
    let diff_path = dir.path().join("status.json");
    tokio::fs::write(&diff_path, "{\"0\": ").await.unwrap();

    let out = dir.path().join("out");
    let config = config().with_diff_path(&diff_path).with_output_dir(&out);
    let err = Pipeline::new(Arc::new(FsShardStore::new(out.clone())), config)
        .run_from_config()
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::DiffParse(_)));
    assert!(!out.exists(), "output is untouched when the diff cannot be read");
}
