//! Packet merge - fold one reading into the running station state
//!
//! Pure function of `(previous packet, reading, role map)`. Fields a reading
//! does not refresh are carried forward from the previous packet, with two
//! exceptions: `rain` is a per-tick delta and is always reset, and a stale
//! `windDir` is dropped when the current wind speed is absent or zero.

use contracts::{Packet, Reading, SensorRole, UnitSystem};

use crate::role_map::SensorRoleMap;

/// Produce the next packet state from at most one previous packet and
/// exactly one new reading.
///
/// Every row counts as one packet tick: a reading matching no configured
/// role still advances `dateTime` and resets `rain`, because downstream
/// timing expects one packet per row.
pub fn merge(previous: Option<&Packet>, reading: &Reading, roles: &SensorRoleMap) -> Packet {
    let mut packet = previous.cloned().unwrap_or_default();

    // Can't carry this one over.
    packet.rain = None;

    let epoch = reading.epoch_seconds();
    packet.date_time = match previous {
        // Downstream keys records by dateTime; bump past the previous packet
        // whenever the natural epoch would collide or step backwards, which
        // keeps 3+ rows sharing one timestamp strictly increasing.
        Some(prev) if prev.date_time >= epoch => {
            metrics::counter!("station_collision_bumps_total").increment(1);
            prev.date_time + 1
        }
        _ => epoch,
    };
    packet.units = UnitSystem::Metric;

    match roles.role_of(&reading.sensor) {
        SensorRole::Indoor => apply_indoor(reading, &mut packet),
        SensorRole::Extra(slot) => apply_extra(reading, &mut packet, slot),
        SensorRole::Bridge => apply_bridge(reading, &mut packet),
        SensorRole::Outdoor => apply_outdoor(reading, &mut packet),
        SensorRole::Unknown => {}
    }

    packet
}

fn apply_indoor(reading: &Reading, packet: &mut Packet) {
    if let Some(t) = reading.temperature_c {
        packet.in_temp = Some(t);
    }
    if let Some(h) = reading.humidity {
        packet.in_humidity = Some(h);
    }
}

fn apply_extra(reading: &Reading, packet: &mut Packet, slot: u8) {
    if let Some(t) = reading.temperature_c {
        packet.set_extra_temp(slot, t);
    }
    if let Some(h) = reading.humidity {
        packet.set_extra_humidity(slot, h);
    }
}

fn apply_bridge(reading: &Reading, packet: &mut Packet) {
    if let Some(pa) = reading.pressure_pa {
        // Pa -> hPa
        packet.barometer = Some(pa / 100.0);
    }
}

fn apply_outdoor(reading: &Reading, packet: &mut Packet) {
    if let Some(t) = reading.temperature_c {
        packet.out_temp = Some(t);
    }
    if let Some(h) = reading.humidity {
        packet.out_humidity = Some(h);
    }
    if let Some(r) = reading.rainfall_mm {
        // mm -> cm
        packet.rain = Some(r / 10.0);
    }
    if let Some(w) = reading.wind_kmh {
        packet.wind_speed = Some(w);
    }
    if let Some(d) = reading.wind_direction {
        packet.wind_dir = Some(d);
    }

    // A direction reading is meaningless without nonzero speed. An absent
    // direction never zeroes the speed.
    if packet.wind_speed.is_none() || packet.wind_speed == Some(0.0) {
        packet.wind_dir = None;
    }
}
