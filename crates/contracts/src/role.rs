//! SensorRole - semantic category a raw sensor id resolves to

use serde::{Deserialize, Serialize};

/// Sensor id reserved for the pressure-reporting bridge itself.
pub const BRIDGE_SENSOR_ID: &str = "bridge";

/// Semantic role of one physical sensor.
///
/// Resolution happens once per reading via the role map; unknown ids are
/// accepted and simply contribute no packet fields, so unconfigured hardware
/// can report without breaking the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorRole {
    /// The outdoor combo sensor (temperature/humidity/rain/wind)
    Outdoor,
    /// The indoor sensor (temperature/humidity)
    Indoor,
    /// The bridge's own pressure sensor
    Bridge,
    /// Numbered extra temperature/humidity sensor (1-based slot)
    Extra(u8),
    /// Not configured; advances the packet clock but adds no fields
    Unknown,
}

impl SensorRole {
    /// Whether this role contributes measurement fields to packets.
    pub fn is_configured(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}
