//! Address Shards Binary
//!
//! Runs one aggregation pass: reads the classified diff, writes shards,
//! layers, reports and the discovery manifest to the output directory.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DIFF_PATH`: classified diff document (default: data/status.json)
//! - `SPECIAL_LAYERS_PATH`: static layers document, empty to disable
//! - `OUTPUT_DIR`: output root, cleared on every run (default: out)
//! - `CDN_URL`, `OSM_URL`: public base addresses
//! - `MOCK` / `DETERMINISTIC`: reference mode for reproducible output
//! - `RUN_DATE`, `RELEASE_VERSION`: description date and changelog version
//! - `RUST_LOG`: Log level filter (default: address_shards=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! DIFF_PATH=data/status.json OUTPUT_DIR=out cargo run --bin address_shards --features cli
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use address_shards::{FsShardStore, Pipeline, PipelineConfig};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "address_shards=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_span_events(FmtSpan::CLOSE))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match PipelineConfig::try_from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(
        diff = %config.diff_path.display(),
        output = %config.output_dir.display(),
        deterministic = config.deterministic,
        "Starting address_shards"
    );

    let store = Arc::new(FsShardStore::new(config.output_dir.clone()));
    let pipeline = Pipeline::new(store, config);

    match pipeline.run_from_config().await {
        Ok(report) => {
            info!(
                run_id = %report.run_id,
                shards = report.shards,
                layers = report.layers.len(),
                manifest_entries = report.manifest_entries,
                manifest_hash = %report.manifest_hash,
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            ExitCode::FAILURE
        }
    }
}
