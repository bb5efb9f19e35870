//! Config validation
//!
//! Rules:
//! - extra sensor ids unique and non-empty
//! - no sensor id assigned to more than one role
//! - the literal `"bridge"` id is reserved for the bridge role
//! - archive_interval_secs > 0, poll_backoff_secs > 0

use std::collections::HashSet;

use contracts::{ContractError, DriverConfig, BRIDGE_SENSOR_ID};

/// Validate a DriverConfig.
///
/// Returns the first error hit, or Ok(()).
pub fn validate(config: &DriverConfig) -> Result<(), ContractError> {
    validate_role_ids(config)?;
    validate_intervals(config)?;
    Ok(())
}

/// Role ids must be non-empty, unique across roles, and not the reserved
/// bridge id.
fn validate_role_ids(config: &DriverConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();

    let named = [
        ("indoor_sensor_id", config.indoor_sensor_id.as_deref()),
        ("outdoor_sensor_id", config.outdoor_sensor_id.as_deref()),
    ];
    for (field, id) in named {
        if let Some(id) = id {
            check_role_id(field, id, &mut seen)?;
        }
    }

    for (idx, id) in config.extra_sensor_ids.iter().enumerate() {
        check_role_id(&format!("extra_sensor_ids[{idx}]"), id, &mut seen)?;
    }

    Ok(())
}

fn check_role_id<'a>(
    field: &str,
    id: &'a str,
    seen: &mut HashSet<&'a str>,
) -> Result<(), ContractError> {
    if id.is_empty() {
        return Err(ContractError::config_validation(
            field,
            "sensor id cannot be empty",
        ));
    }
    if id == BRIDGE_SENSOR_ID {
        return Err(ContractError::config_validation(
            field,
            format!("'{BRIDGE_SENSOR_ID}' is reserved for the bridge role"),
        ));
    }
    if !seen.insert(id) {
        return Err(ContractError::config_validation(
            field,
            format!("duplicate sensor id '{id}'"),
        ));
    }
    Ok(())
}

/// Cadence values must be nonzero.
fn validate_intervals(config: &DriverConfig) -> Result<(), ContractError> {
    if config.archive_interval_secs == 0 {
        return Err(ContractError::config_validation(
            "archive_interval_secs",
            "must be > 0",
        ));
    }
    if config.poll_backoff_secs == 0 {
        return Err(ContractError::config_validation(
            "poll_backoff_secs",
            "must be > 0",
        ));
    }
    Ok(())
}
