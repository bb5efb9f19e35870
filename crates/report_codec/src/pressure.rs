//! Bridge pressure computation
//!
//! `mt=pressure` reports carry the raw pressure word plus the sensor's
//! factory calibration words (MS55xx-style). Absolute pressure in Pascal is
//! computed with the vendor compensation polynomial.

use std::collections::HashMap;

use contracts::ContractError;

/// Calibration/measurement words expected in a pressure report, hex-encoded.
const PRESSURE_KEYS: [&str; 13] = [
    "A", "B", "C", "C1", "C2", "C3", "C4", "C5", "C6", "C7", "D", "PR", "TR",
];

/// Compute absolute pressure in Pascal from a pressure report's key/value
/// pairs. Every calibration word must be present.
pub fn pressure_pa(values: &HashMap<&str, &str>) -> Result<i64, ContractError> {
    let mut v: HashMap<&str, f64> = HashMap::with_capacity(PRESSURE_KEYS.len());
    for key in PRESSURE_KEYS {
        let raw = values.get(key).ok_or_else(|| {
            ContractError::field_decode("pressure", format!("missing calibration word '{key}'"))
        })?;
        let word = i64::from_str_radix(raw, 16).map_err(|e| {
            ContractError::field_decode("pressure", format!("word '{key}'='{raw}': {e}"))
        })?;
        v.insert(key, word as f64);
    }

    let coef = if v["TR"] >= v["C5"] { v["A"] } else { v["B"] };

    let d_ut_part = (v["TR"] - v["C5"]) / 128.0;
    let d_ut = v["TR"] - v["C5"] - d_ut_part * d_ut_part * coef / 2f64.powf(v["C"]);
    let off = (v["C2"] + (v["C4"] - 1024.0) * d_ut / 16384.0) * 4.0;
    let sens = v["C1"] + v["C3"] * d_ut / 1024.0;
    let x = sens * (v["PR"] - 7168.0) / 16384.0 - off;
    let p = (x * 100.0 / 32.0) + v["C7"] * 10.0;

    Ok(p as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    /// TR == C5 zeroes the temperature compensation term, which makes the
    /// polynomial easy to verify by hand:
    /// OFF = C2*4, SENS = C1, X = C1*(PR-7168)/16384 - OFF, P = X*100/32 + C7*10.
    #[test]
    fn test_sea_level_pressure() {
        let values = words(&[
            ("A", "1"),
            ("B", "1"),
            ("C", "1"),
            ("C1", "BB8"),  // 3000
            ("C2", "3E8"),  // 1000
            ("C3", "0"),
            ("C4", "400"),  // 1024
            ("C5", "3E8"),  // 1000
            ("C6", "0"),
            ("C7", "28CD"), // 10445
            ("D", "1"),
            ("PR", "5C00"), // 23552 = 7168 + 16384
            ("TR", "3E8"),  // 1000
        ]);
        // X = 3000*16384/16384 - 4000 = -1000; P = -3125 + 104450 = 101325
        assert_eq!(pressure_pa(&values).unwrap(), 101_325);
    }

    #[test]
    fn test_missing_word_rejected() {
        let values = words(&[("A", "1"), ("B", "1")]);
        let err = pressure_pa(&values).unwrap_err().to_string();
        assert!(err.contains("missing calibration word"), "got: {err}");
    }

    #[test]
    fn test_non_hex_word_rejected() {
        let mut values = words(&[
            ("A", "1"),
            ("B", "1"),
            ("C", "1"),
            ("C1", "BB8"),
            ("C2", "3E8"),
            ("C3", "0"),
            ("C4", "400"),
            ("C5", "3E8"),
            ("C6", "0"),
            ("C7", "28CD"),
            ("D", "1"),
            ("PR", "5C00"),
        ]);
        values.insert("TR", "zz");
        assert!(pressure_pa(&values).is_err());
    }
}
