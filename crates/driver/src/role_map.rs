//! SensorRoleMap - raw sensor id to semantic role resolution

use std::collections::HashMap;

use contracts::{ContractError, DriverConfig, SensorRole, BRIDGE_SENSOR_ID};

/// Static resolution of raw sensor ids to semantic roles.
///
/// Built once from configuration; immutable thereafter. Extra ids get
/// 1-based slot numbers in declaration order. Unknown ids resolve to
/// [`SensorRole::Unknown`] rather than failing, so unconfigured hardware
/// still ticks the packet clock.
#[derive(Debug, Clone)]
pub struct SensorRoleMap {
    outdoor: Option<String>,
    indoor: Option<String>,
    extras: HashMap<String, u8>,
}

impl SensorRoleMap {
    /// Build from configuration, failing fast on malformed role tables.
    pub fn from_config(config: &DriverConfig) -> Result<Self, ContractError> {
        if config.extra_sensor_ids.len() > u8::MAX as usize {
            return Err(ContractError::config_validation(
                "extra_sensor_ids",
                format!("at most {} extra slots supported", u8::MAX),
            ));
        }

        let mut extras = HashMap::with_capacity(config.extra_sensor_ids.len());
        for (idx, id) in config.extra_sensor_ids.iter().enumerate() {
            Self::check_assignable(&format!("extra_sensor_ids[{idx}]"), id, config, &extras)?;
            extras.insert(id.clone(), (idx + 1) as u8);
        }

        for (field, id) in [
            ("indoor_sensor_id", config.indoor_sensor_id.as_deref()),
            ("outdoor_sensor_id", config.outdoor_sensor_id.as_deref()),
        ] {
            if let Some(id) = id {
                if id.is_empty() || id == BRIDGE_SENSOR_ID {
                    return Err(ContractError::config_validation(
                        field,
                        format!("invalid sensor id '{id}'"),
                    ));
                }
            }
        }
        if config.indoor_sensor_id.is_some()
            && config.indoor_sensor_id == config.outdoor_sensor_id
        {
            return Err(ContractError::config_validation(
                "indoor_sensor_id",
                "indoor and outdoor roles share one sensor id",
            ));
        }

        Ok(Self {
            outdoor: config.outdoor_sensor_id.clone(),
            indoor: config.indoor_sensor_id.clone(),
            extras,
        })
    }

    fn check_assignable(
        field: &str,
        id: &str,
        config: &DriverConfig,
        extras: &HashMap<String, u8>,
    ) -> Result<(), ContractError> {
        if id.is_empty() || id == BRIDGE_SENSOR_ID {
            return Err(ContractError::config_validation(
                field,
                format!("invalid sensor id '{id}'"),
            ));
        }
        if extras.contains_key(id)
            || config.indoor_sensor_id.as_deref() == Some(id)
            || config.outdoor_sensor_id.as_deref() == Some(id)
        {
            return Err(ContractError::config_validation(
                field,
                format!("sensor id '{id}' assigned to more than one role"),
            ));
        }
        Ok(())
    }

    /// Resolve one raw sensor id.
    pub fn role_of(&self, sensor: &str) -> SensorRole {
        if sensor == BRIDGE_SENSOR_ID {
            SensorRole::Bridge
        } else if self.outdoor.as_deref() == Some(sensor) {
            SensorRole::Outdoor
        } else if self.indoor.as_deref() == Some(sensor) {
            SensorRole::Indoor
        } else if let Some(&slot) = self.extras.get(sensor) {
            SensorRole::Extra(slot)
        } else {
            SensorRole::Unknown
        }
    }

    /// Configured extra sensors as `(id, slot)`, ordered by slot.
    pub fn extra_slots(&self) -> Vec<(&str, u8)> {
        let mut slots: Vec<_> = self
            .extras
            .iter()
            .map(|(id, &slot)| (id.as_str(), slot))
            .collect();
        slots.sort_by_key(|&(_, slot)| slot);
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DriverConfig {
        DriverConfig {
            indoor_sensor_id: Some("00002".into()),
            outdoor_sensor_id: Some("00001".into()),
            extra_sensor_ids: vec!["00003".into(), "00004".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_role_resolution() {
        let roles = SensorRoleMap::from_config(&config()).unwrap();
        assert_eq!(roles.role_of("00001"), SensorRole::Outdoor);
        assert_eq!(roles.role_of("00002"), SensorRole::Indoor);
        assert_eq!(roles.role_of("bridge"), SensorRole::Bridge);
        assert_eq!(roles.role_of("00003"), SensorRole::Extra(1));
        assert_eq!(roles.role_of("00004"), SensorRole::Extra(2));
        assert_eq!(roles.role_of("cafe"), SensorRole::Unknown);
    }

    #[test]
    fn test_slots_follow_declaration_order() {
        let roles = SensorRoleMap::from_config(&config()).unwrap();
        assert_eq!(roles.extra_slots(), vec![("00003", 1), ("00004", 2)]);
    }

    #[test]
    fn test_duplicate_extra_rejected() {
        let mut cfg = config();
        cfg.extra_sensor_ids.push("00003".into());
        assert!(SensorRoleMap::from_config(&cfg).is_err());
    }

    #[test]
    fn test_extra_overlapping_outdoor_rejected() {
        let mut cfg = config();
        cfg.extra_sensor_ids.push("00001".into());
        assert!(SensorRoleMap::from_config(&cfg).is_err());
    }

    #[test]
    fn test_bridge_literal_rejected_for_roles() {
        let mut cfg = config();
        cfg.indoor_sensor_id = Some("bridge".into());
        assert!(SensorRoleMap::from_config(&cfg).is_err());
    }

    #[test]
    fn test_indoor_outdoor_collision_rejected() {
        let mut cfg = config();
        cfg.indoor_sensor_id = cfg.outdoor_sensor_id.clone();
        assert!(SensorRoleMap::from_config(&cfg).is_err());
    }

    #[test]
    fn test_unconfigured_map_accepts_everything_as_unknown() {
        let roles = SensorRoleMap::from_config(&DriverConfig::default()).unwrap();
        assert_eq!(roles.role_of("00001"), SensorRole::Unknown);
        assert_eq!(roles.role_of("bridge"), SensorRole::Bridge);
    }
}
