//! Packet - one merged station observation
//!
//! Field names follow the downstream weather engine's vocabulary
//! (`dateTime`, `usUnits`, `outTemp`, ...). Absent fields mean "unknown",
//! never zero.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Wire value of the metric unit system expected downstream.
const METRIC_WIRE_VALUE: u64 = 16;

/// Unit system marker carried by every packet.
///
/// The core emits metric only; the marker exists so the downstream engine
/// can assert it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
}

impl UnitSystem {
    /// Numeric value used on the wire.
    pub const fn wire_value(self) -> u64 {
        METRIC_WIRE_VALUE
    }
}

impl Serialize for UnitSystem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.wire_value())
    }
}

impl<'de> Deserialize<'de> for UnitSystem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u64::deserialize(deserializer)?;
        if value == METRIC_WIRE_VALUE {
            Ok(Self::Metric)
        } else {
            Err(de::Error::custom(format!(
                "unsupported unit system: {value}"
            )))
        }
    }
}

/// Best-known full station state at one instant.
///
/// Created by the merge step from at most one prior packet and exactly one
/// new [`crate::Reading`]; immutable once emitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Packet {
    /// Epoch seconds; strictly increasing within one traversal
    #[serde(rename = "dateTime")]
    pub date_time: i64,

    /// Fixed metric marker
    #[serde(rename = "usUnits", default)]
    pub units: UnitSystem,

    /// Barometric pressure, hPa
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barometer: Option<f64>,

    /// Indoor temperature, Celsius
    #[serde(rename = "inTemp", default, skip_serializing_if = "Option::is_none")]
    pub in_temp: Option<f64>,

    /// Indoor relative humidity, percent
    #[serde(rename = "inHumidity", default, skip_serializing_if = "Option::is_none")]
    pub in_humidity: Option<f64>,

    /// Outdoor temperature, Celsius
    #[serde(rename = "outTemp", default, skip_serializing_if = "Option::is_none")]
    pub out_temp: Option<f64>,

    /// Outdoor relative humidity, percent
    #[serde(
        rename = "outHumidity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub out_humidity: Option<f64>,

    /// Per-tick rainfall, cm; never carried forward
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<f64>,

    /// Wind speed, km/h
    #[serde(rename = "windSpeed", default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,

    /// Wind direction, compass degrees; only meaningful with nonzero speed
    #[serde(rename = "windDir", default, skip_serializing_if = "Option::is_none")]
    pub wind_dir: Option<f64>,

    /// `extraTemp<N>` / `extraHumid<N>` values for configured extra slots
    #[serde(flatten)]
    pub extra: BTreeMap<String, f64>,
}

impl Packet {
    /// Record an extra-slot temperature (`extraTemp<slot>`).
    pub fn set_extra_temp(&mut self, slot: u8, value: f64) {
        self.extra.insert(format!("extraTemp{slot}"), value);
    }

    /// Record an extra-slot humidity (`extraHumid<slot>`).
    pub fn set_extra_humidity(&mut self, slot: u8, value: f64) {
        self.extra.insert(format!("extraHumid{slot}"), value);
    }

    /// Extra-slot temperature, if known.
    pub fn extra_temp(&self, slot: u8) -> Option<f64> {
        self.extra.get(&format!("extraTemp{slot}")).copied()
    }

    /// Extra-slot humidity, if known.
    pub fn extra_humidity(&self, slot: u8) -> Option<f64> {
        self.extra.get(&format!("extraHumid{slot}")).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_wire_value() {
        let json = serde_json::to_value(UnitSystem::Metric).unwrap();
        assert_eq!(json, 16);
        let back: UnitSystem = serde_json::from_value(json).unwrap();
        assert_eq!(back, UnitSystem::Metric);
    }

    #[test]
    fn test_units_rejects_unknown_value() {
        let result: Result<UnitSystem, _> = serde_json::from_str("1");
        assert!(result.is_err());
    }

    #[test]
    fn test_packet_field_names() {
        let mut packet = Packet {
            date_time: 1000,
            out_temp: Some(21.4),
            rain: Some(0.5),
            ..Default::default()
        };
        packet.set_extra_temp(2, 18.0);

        let json = serde_json::to_value(&packet).unwrap();
        assert_eq!(json["dateTime"], 1000);
        assert_eq!(json["usUnits"], 16);
        assert_eq!(json["outTemp"], 21.4);
        assert_eq!(json["rain"], 0.5);
        assert_eq!(json["extraTemp2"], 18.0);
        // unknown fields stay absent, never zero-filled
        assert!(json.get("windSpeed").is_none());
        assert!(json.get("barometer").is_none());
    }

    #[test]
    fn test_packet_round_trip_with_extras() {
        let mut packet = Packet {
            date_time: 42,
            barometer: Some(1013.25),
            ..Default::default()
        };
        packet.set_extra_humidity(1, 60.0);

        let json = serde_json::to_string(&packet).unwrap();
        let back: Packet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, packet);
        assert_eq!(back.extra_humidity(1), Some(60.0));
    }
}
