//! `stream` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use observability::StreamMetricsAggregator;
use tracing::{info, warn};

use crate::cli::StreamArgs;
use crate::readings::load_store;
use driver::RecordStreamEngine;

/// Execute the `stream` command.
///
/// Loads the readings log into a row store and runs a startup catch-up
/// traversal (suppressing packets at or before `--resume-from`); with
/// `--follow` it tails the log instead, running until Ctrl+C or
/// `--max-packets`.
pub async fn run_stream(args: &StreamArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let store = Arc::new(load_store(&args.readings)?);

    info!(
        hardware = %config.hardware_name,
        archive_interval_secs = config.archive_interval_secs,
        rows = store.len(),
        "Configuration loaded"
    );

    // Dry run - configuration and readings both load, nothing to stream
    if args.dry_run {
        info!("Dry run mode - configuration and readings are valid, exiting");
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let engine = RecordStreamEngine::new(store, &config)?;

    let (mut rx, handle) = if args.follow {
        engine.spawn_loop_packets(args.buffer_size)
    } else {
        engine.spawn_startup_records(args.resume_from, args.buffer_size)
    };

    let shutdown_signal = setup_shutdown_signal();
    tokio::pin!(shutdown_signal);

    let mut aggregator = StreamMetricsAggregator::new();
    let mut emitted = 0u64;
    loop {
        tokio::select! {
            packet = rx.recv() => {
                let Some(packet) = packet else { break };
                println!("{}", serde_json::to_string(&packet)?);
                aggregator.update(&packet);
                emitted += 1;
                if args.max_packets != 0 && emitted >= args.max_packets {
                    info!(emitted, "Packet limit reached, stopping stream");
                    break;
                }
            }
            _ = &mut shutdown_signal => {
                warn!("Received shutdown signal, stopping stream...");
                break;
            }
        }
    }

    // Dropping the receiver cancels the traversal task
    drop(rx);
    handle
        .await
        .context("Stream task panicked")?
        .context("Stream traversal failed")?;

    eprintln!("{}", aggregator.summary());
    info!(emitted, "Stationlink stream finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
