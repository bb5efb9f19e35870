//! Reading - one raw sensor sample row from storage
//!
//! Rows are produced by the external ingestion process; the core only reads
//! them, never writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One time-stamped sensor row.
///
/// `id` is strictly increasing and unique; `timestamp` is non-decreasing
/// with `id` but may repeat across sensors. Measurement fields are sparse:
/// absence means "no update this tick", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Monotonic row id (storage primary key)
    pub id: u64,

    /// Raw sensor identifier as reported by the bridge
    pub sensor: String,

    /// Row instant (UTC)
    pub timestamp: DateTime<Utc>,

    /// Temperature in Celsius
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,

    /// Relative humidity in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,

    /// Barometric pressure in Pascal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_pa: Option<f64>,

    /// Per-tick rainfall delta in millimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall_mm: Option<f64>,

    /// Wind speed in km/h
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_kmh: Option<f64>,

    /// Wind direction in compass degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction: Option<f64>,

    /// Reporting bridge identifier (diagnostic, never merged)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_id: Option<String>,

    /// Battery state as reported (diagnostic, never merged)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<String>,

    /// Signal strength in percent (diagnostic, never merged)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_rssi: Option<i32>,
}

impl Reading {
    /// Create a reading with only the identity fields set.
    pub fn new(id: u64, sensor: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            sensor: sensor.into(),
            timestamp,
            temperature_c: None,
            humidity: None,
            pressure_pa: None,
            rainfall_mm: None,
            wind_kmh: None,
            wind_direction: None,
            bridge_id: None,
            battery: None,
            signal_rssi: None,
        }
    }

    /// Row instant as UTC epoch seconds.
    pub fn epoch_seconds(&self) -> i64 {
        self.timestamp.timestamp()
    }
}

/// Position of the last consumed reading in a traversal.
///
/// One cursor per independent traversal; the live stream and an archive
/// replay never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Id of the last consumed row
    pub id: u64,

    /// Timestamp of the last consumed row
    pub timestamp: DateTime<Utc>,
}

impl From<&Reading> for Cursor {
    fn from(reading: &Reading) -> Self {
        Self {
            id: reading.id,
            timestamp: reading.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_sparse_fields_skip_serialization() {
        let reading = Reading::new(1, "00001", ts(1000));
        let json = serde_json::to_value(&reading).unwrap();
        assert!(json.get("temperature_c").is_none());
        assert!(json.get("humidity").is_none());
        assert_eq!(json["id"], 1);
        assert_eq!(json["sensor"], "00001");
    }

    #[test]
    fn test_round_trip_with_measurements() {
        let mut reading = Reading::new(7, "00002", ts(1234));
        reading.temperature_c = Some(21.4);
        reading.humidity = Some(55.0);
        reading.signal_rssi = Some(75);

        let json = serde_json::to_string(&reading).unwrap();
        let back: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn test_cursor_from_reading() {
        let reading = Reading::new(42, "bridge", ts(99));
        let cursor = Cursor::from(&reading);
        assert_eq!(cursor.id, 42);
        assert_eq!(cursor.timestamp, ts(99));
    }

    #[test]
    fn test_epoch_seconds() {
        let reading = Reading::new(1, "00001", ts(1_700_000_000));
        assert_eq!(reading.epoch_seconds(), 1_700_000_000);
    }
}
