//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    hardware_name: String,
    archive_interval_secs: u64,
    poll_backoff_secs: u64,
    roles: RolesInfo,
}

#[derive(Serialize)]
struct RolesInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    outdoor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indoor: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extras: Vec<ExtraInfo>,
}

#[derive(Serialize)]
struct ExtraInfo {
    id: String,
    slot: u8,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&config);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn build_config_info(config: &contracts::DriverConfig) -> ConfigInfo {
    let extras = config
        .extra_sensor_ids
        .iter()
        .enumerate()
        .map(|(idx, id)| ExtraInfo {
            id: id.clone(),
            slot: (idx + 1) as u8,
        })
        .collect();

    ConfigInfo {
        hardware_name: config.hardware_name.clone(),
        archive_interval_secs: config.archive_interval_secs,
        poll_backoff_secs: config.poll_backoff_secs,
        roles: RolesInfo {
            outdoor: config.outdoor_sensor_id.clone(),
            indoor: config.indoor_sensor_id.clone(),
            extras,
        },
    }
}

fn print_config_info(config: &contracts::DriverConfig) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Stationlink Configuration                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("🛰  Station");
    println!("   ├─ Hardware: {}", config.hardware_name);
    println!("   ├─ Archive interval: {}s", config.archive_interval_secs);
    println!("   └─ Poll backoff: {}s", config.poll_backoff_secs);

    println!("\n📡 Sensor Roles");
    println!(
        "   ├─ Outdoor: {}",
        config.outdoor_sensor_id.as_deref().unwrap_or("(none)")
    );
    println!(
        "   ├─ Indoor: {}",
        config.indoor_sensor_id.as_deref().unwrap_or("(none)")
    );
    if config.extra_sensor_ids.is_empty() {
        println!("   └─ Extras: (none)");
    } else {
        println!("   └─ Extras ({}):", config.extra_sensor_ids.len());
        for (idx, id) in config.extra_sensor_ids.iter().enumerate() {
            let is_last = idx == config.extra_sensor_ids.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            println!("       {} slot {}: {}", prefix, idx + 1, id);
        }
    }

    println!();
}
