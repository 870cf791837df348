//! Temperature scale conversion and the composed weather response.

use serde::{Deserialize, Serialize};

/// One reading expressed on three scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperatures {
    pub celsius: f64,
    pub fahrenheit: f64,
    pub kelvin: f64,
}

impl Temperatures {
    /// Kelvin uses an offset of 273, not 273.15.
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            fahrenheit: celsius * 1.8 + 32.0,
            kelvin: celsius + 273.0,
        }
    }
}

/// Successful resolution-service response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl WeatherReport {
    pub fn compose(city: impl Into<String>, celsius: f64) -> Self {
        let t = Temperatures::from_celsius(celsius);
        Self {
            city: city.into(),
            temp_c: t.celsius,
            temp_f: t.fahrenheit,
            temp_k: t.kelvin,
        }
    }
}
