//! Fixed-point ASCII field decoders
//!
//! Each measurement arrives as a flag character followed by a zero-padded
//! decimal body. Scaling uses integer arithmetic first so rounding matches
//! the bridge firmware exactly.

use contracts::ContractError;

/// 16-point compass rose keyed by the bridge's direction nibble.
const WIND_DIRECTIONS: [(char, f64); 16] = [
    ('5', 0.0),
    ('7', 22.5),
    ('3', 45.0),
    ('1', 67.5),
    ('9', 90.0),
    ('B', 112.5),
    ('F', 135.0),
    ('D', 157.5),
    ('C', 180.0),
    ('E', 202.5),
    ('A', 225.0),
    ('8', 247.5),
    ('0', 270.0),
    ('2', 292.5),
    ('6', 315.0),
    ('4', 337.5),
];

fn body(field: &str, raw: &str, drop_tail: usize) -> Result<i64, ContractError> {
    // flag char + at least one digit + the discarded tail
    if raw.len() < 2 + drop_tail {
        return Err(ContractError::field_decode(
            field,
            format!("value too short: '{raw}'"),
        ));
    }
    raw[1..raw.len() - drop_tail]
        .parse::<i64>()
        .map_err(|e| ContractError::field_decode(field, format!("'{raw}': {e}")))
}

/// `AXYYZZZZZZ` -> Y.Z Celsius ('-' after the flag means negative).
///
/// Only two decimals matter; the third digit is kept for the +5 rounding.
pub fn temperature_c(raw: &str) -> Result<f64, ContractError> {
    let v = body("temperature", raw, 3)?;
    Ok(((5 + v) / 10) as f64 / 100.0)
}

/// `AXXXY` -> X.Y percent.
pub fn humidity(raw: &str) -> Result<f64, ContractError> {
    let v = body("humidity", raw, 0)?;
    Ok(v as f64 / 10.0)
}

/// `AXXXXYYY` -> X.Y mm.
pub fn rainfall_mm(raw: &str) -> Result<f64, ContractError> {
    let v = body("rainfall", raw, 0)?;
    Ok(v as f64 / 1000.0)
}

/// `AXXXXXXYYY` in mm/s -> km/h.
///
/// km/h = mm/s * 36 / 10000; the +50 rounds the second decimal.
pub fn wind_kmh(raw: &str) -> Result<f64, ContractError> {
    let v = body("windspeed", raw, 3)?;
    Ok(((50 + v * 36) / 100) as f64 / 100.0)
}

/// Direction nibble -> compass degrees.
pub fn wind_direction(raw: &str) -> Result<f64, ContractError> {
    let mut chars = raw.chars();
    let (Some(nibble), None) = (chars.next(), chars.next()) else {
        return Err(ContractError::field_decode(
            "winddir",
            format!("expected one character, got '{raw}'"),
        ));
    };
    WIND_DIRECTIONS
        .iter()
        .find(|(c, _)| *c == nibble.to_ascii_uppercase())
        .map(|(_, degrees)| *degrees)
        .ok_or_else(|| {
            ContractError::field_decode("winddir", format!("unknown direction nibble '{nibble}'"))
        })
}

/// Bars 0..=4 -> percent.
pub fn signal_rssi(raw: &str) -> Result<i32, ContractError> {
    let v: i32 = raw
        .parse()
        .map_err(|e| ContractError::field_decode("rssi", format!("'{raw}': {e}")))?;
    Ok(v * 25)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_positive() {
        // body 021400 -> (5 + 21400) / 10 = 2140 -> 21.40
        assert_eq!(temperature_c("A021400000").unwrap(), 21.4);
    }

    #[test]
    fn test_temperature_negative() {
        // body -05300 -> (5 - 5300) / 10 = -529 -> -5.29
        assert_eq!(temperature_c("A-05300000").unwrap(), -5.29);
    }

    #[test]
    fn test_temperature_too_short() {
        assert!(temperature_c("A01").is_err());
    }

    #[test]
    fn test_humidity() {
        assert_eq!(humidity("A0750").unwrap(), 75.0);
    }

    #[test]
    fn test_rainfall() {
        assert_eq!(rainfall_mm("A0000010").unwrap(), 0.01);
        assert_eq!(rainfall_mm("A0005000").unwrap(), 5.0);
    }

    #[test]
    fn test_wind_speed() {
        // body 001700 -> (50 + 1700 * 36) / 100 = 612 -> 6.12 km/h
        assert_eq!(wind_kmh("A001700000").unwrap(), 6.12);
        assert_eq!(wind_kmh("A000000000").unwrap(), 0.0);
    }

    #[test]
    fn test_wind_direction_rose() {
        assert_eq!(wind_direction("5").unwrap(), 0.0);
        assert_eq!(wind_direction("0").unwrap(), 270.0);
        assert_eq!(wind_direction("b").unwrap(), 112.5);
        assert!(wind_direction("G").is_err());
        assert!(wind_direction("55").is_err());
    }

    #[test]
    fn test_rssi_bars_to_percent() {
        assert_eq!(signal_rssi("0").unwrap(), 0);
        assert_eq!(signal_rssi("3").unwrap(), 75);
        assert_eq!(signal_rssi("4").unwrap(), 100);
        assert!(signal_rssi("x").is_err());
    }
}
