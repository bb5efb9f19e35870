//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    hardware_name: String,
    archive_interval_secs: u64,
    poll_backoff_secs: u64,
    outdoor_sensor: Option<String>,
    indoor_sensor: Option<String>,
    extra_sensor_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    hardware_name: config.hardware_name.clone(),
                    archive_interval_secs: config.archive_interval_secs,
                    poll_backoff_secs: config.poll_backoff_secs,
                    outdoor_sensor: config.outdoor_sensor_id.clone(),
                    indoor_sensor: config.indoor_sensor_id.clone(),
                    extra_sensor_count: config.extra_sensor_ids.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &contracts::DriverConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.outdoor_sensor_id.is_none() {
        warnings.push(
            "No outdoor sensor configured - outdoor readings resolve to unknown".to_string(),
        );
    }
    if config.indoor_sensor_id.is_none() && config.extra_sensor_ids.is_empty() {
        warnings.push("No indoor or extra sensors configured".to_string());
    }
    if config.poll_backoff_secs >= config.archive_interval_secs {
        warnings.push(format!(
            "Poll backoff ({}s) is not shorter than the archive interval ({}s)",
            config.poll_backoff_secs, config.archive_interval_secs
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Hardware: {}", summary.hardware_name);
            println!("  Archive interval: {}s", summary.archive_interval_secs);
            println!("  Poll backoff: {}s", summary.poll_backoff_secs);
            println!(
                "  Outdoor sensor: {}",
                summary.outdoor_sensor.as_deref().unwrap_or("(none)")
            );
            println!(
                "  Indoor sensor: {}",
                summary.indoor_sensor.as_deref().unwrap_or("(none)")
            );
            println!("  Extra sensors: {}", summary.extra_sensor_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
