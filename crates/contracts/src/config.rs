//! DriverConfig - Config Loader output
//!
//! Enumerated configuration surface of the stream driver. Parsing and
//! validation live in `config_loader`; role resolution in the driver crate.

use serde::{Deserialize, Serialize};

/// Complete driver configuration.
///
/// Extra sensor ids are an ordered list: declaration order assigns the
/// 1-based `extraTemp<N>` / `extraHumid<N>` slot numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Sensor id mapped to the indoor role
    #[serde(default)]
    pub indoor_sensor_id: Option<String>,

    /// Sensor id mapped to the outdoor role
    #[serde(default)]
    pub outdoor_sensor_id: Option<String>,

    /// Ordered extra sensor ids (slot 1, slot 2, ...)
    #[serde(default)]
    pub extra_sensor_ids: Vec<String>,

    /// Identity string reported to the host engine
    #[serde(default = "default_hardware_name")]
    pub hardware_name: String,

    /// Fixed reporting cadence reported to the host engine, seconds
    #[serde(default = "default_archive_interval_secs")]
    pub archive_interval_secs: u64,

    /// Sleep between empty live polls, seconds
    #[serde(default = "default_poll_backoff_secs")]
    pub poll_backoff_secs: u64,
}

fn default_hardware_name() -> String {
    "generic 5-in-1 station".to_string()
}

fn default_archive_interval_secs() -> u64 {
    60
}

fn default_poll_backoff_secs() -> u64 {
    1
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            indoor_sensor_id: None,
            outdoor_sensor_id: None,
            extra_sensor_ids: Vec::new(),
            hardware_name: default_hardware_name(),
            archive_interval_secs: default_archive_interval_secs(),
            poll_backoff_secs: default_poll_backoff_secs(),
        }
    }
}
