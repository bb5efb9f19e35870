//! `replay` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use observability::StreamMetricsAggregator;
use tracing::info;

use crate::cli::ReplayArgs;
use crate::readings::load_store;
use driver::RecordStreamEngine;

/// Execute the `replay` command: one bounded archive traversal, then exit.
pub async fn run_replay(args: &ReplayArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let store = Arc::new(load_store(&args.readings)?);
    let engine = RecordStreamEngine::new(store, &config)?;

    let (mut rx, handle) = engine.spawn_archive_records(args.since, args.buffer_size);

    let mut aggregator = StreamMetricsAggregator::new();
    while let Some(packet) = rx.recv().await {
        println!("{}", serde_json::to_string(&packet)?);
        aggregator.update(&packet);
    }

    handle
        .await
        .context("Replay task panicked")?
        .context("Archive traversal failed")?;

    eprintln!("{}", aggregator.summary());
    info!(
        packets = aggregator.total_packets,
        "Stationlink replay finished"
    );
    Ok(())
}
