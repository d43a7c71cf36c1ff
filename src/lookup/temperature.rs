//! Celsius to Fahrenheit/Kelvin conversion and the final response body.

use serde::{Deserialize, Serialize};

/// Offset applied for Kelvin. Kept at 273 (not 273.15) so reports match
/// what existing clients of the service already receive.
pub const KELVIN_OFFSET: f64 = 273.0;

/// Body returned by `GET /tempo` on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReport {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl TemperatureReport {
    pub fn new(city: impl Into<String>, celsius: f64) -> Self {
        Self {
            city: city.into(),
            temp_c: celsius,
            temp_f: celsius_to_fahrenheit(celsius),
            temp_k: celsius_to_kelvin(celsius),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_reference_points() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_kelvin(0.0), 273.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn report_serializes_with_wire_field_names() {
        let report = TemperatureReport::new("São Paulo", 25.0);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "city": "São Paulo",
                "temp_C": 25.0,
                "temp_F": 77.0,
                "temp_K": 298.0
            })
        );
    }
}
