//! Report - one decoded bridge report line

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use contracts::{ContractError, Reading, BRIDGE_SENSOR_ID};
use tracing::trace;

use crate::decode;
use crate::pressure;

/// One decoded observation report from the station bridge.
///
/// Either a sensor report (sparse measurement fields) or a pressure report
/// from the bridge itself (`report_type == "pressure"`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    /// Reporting bridge id (`id` key, mandatory)
    pub bridge_id: String,

    /// Report type (`mt` key, mandatory)
    pub report_type: String,

    /// Originating sensor id; `"bridge"` for pressure reports
    pub sensor: Option<String>,

    pub temperature_c: Option<f64>,
    pub humidity: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub wind_kmh: Option<f64>,
    pub wind_direction: Option<f64>,
    pub pressure_pa: Option<f64>,
    pub battery: Option<String>,
    pub signal_rssi: Option<i32>,
}

impl Report {
    /// Parse one `key=value&key=value` report line.
    ///
    /// `mt` and `id` are mandatory. A malformed measurement field fails the
    /// whole report; the bridge resends on its next cycle.
    pub fn parse(line: &str) -> Result<Self, ContractError> {
        let values = split_pairs(line.trim());

        let report_type = values
            .get("mt")
            .copied()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ContractError::report_parse("'mt' not found in report"))?;
        let bridge_id = values
            .get("id")
            .copied()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ContractError::report_parse("'id' not found in report"))?;

        let mut report = Report {
            bridge_id: bridge_id.to_string(),
            report_type: report_type.to_string(),
            ..Default::default()
        };

        if report_type == "pressure" {
            report.sensor = Some(BRIDGE_SENSOR_ID.to_string());
            report.pressure_pa = Some(pressure::pressure_pa(&values)? as f64);
            trace!(bridge_id = %report.bridge_id, "decoded pressure report");
            return Ok(report);
        }

        if let Some(sensor) = values.get("sensor").filter(|v| !v.is_empty()) {
            report.sensor = Some(sensor.to_string());
        }
        if let Some(raw) = values.get("temperature").filter(|v| !v.is_empty()) {
            report.temperature_c = Some(decode::temperature_c(raw)?);
        }
        if let Some(raw) = values.get("humidity").filter(|v| !v.is_empty()) {
            report.humidity = Some(decode::humidity(raw)?);
        }
        if let Some(raw) = values.get("rainfall").filter(|v| !v.is_empty()) {
            report.rainfall_mm = Some(decode::rainfall_mm(raw)?);
        }
        if let Some(raw) = values.get("windspeed").filter(|v| !v.is_empty()) {
            report.wind_kmh = Some(decode::wind_kmh(raw)?);
        }
        if let Some(raw) = values.get("winddir").filter(|v| !v.is_empty()) {
            report.wind_direction = Some(decode::wind_direction(raw)?);
        }
        if let Some(battery) = values.get("battery").filter(|v| !v.is_empty()) {
            report.battery = Some(battery.to_string());
        }
        if let Some(raw) = values.get("rssi").filter(|v| !v.is_empty()) {
            report.signal_rssi = Some(decode::signal_rssi(raw)?);
        }

        trace!(
            bridge_id = %report.bridge_id,
            sensor = ?report.sensor,
            mt = %report.report_type,
            "decoded sensor report"
        );
        Ok(report)
    }

    /// Convert into a storage-shaped [`Reading`].
    ///
    /// Row id and instant come from the ingestion context; the codec has no
    /// opinion about either.
    pub fn into_reading(self, id: u64, timestamp: DateTime<Utc>) -> Reading {
        let mut reading = Reading::new(id, self.sensor.unwrap_or_default(), timestamp);
        reading.temperature_c = self.temperature_c;
        reading.humidity = self.humidity;
        reading.pressure_pa = self.pressure_pa;
        reading.rainfall_mm = self.rainfall_mm;
        reading.wind_kmh = self.wind_kmh;
        reading.wind_direction = self.wind_direction;
        reading.bridge_id = Some(self.bridge_id);
        reading.battery = self.battery;
        reading.signal_rssi = self.signal_rssi;
        reading
    }
}

/// Split a report body into key/value pairs. The bridge never
/// percent-encodes, so a plain split is sufficient.
fn split_pairs(line: &str) -> HashMap<&str, &str> {
    line.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect()
}
