use serde::{Deserialize, Serialize};

/// How a caller-supplied location key is forwarded to the provider.
///
/// Classification is purely syntactic: a key carrying both a `lat=` and a
/// `lon=` marker is treated as ready-made coordinate query text and forwarded
/// verbatim; anything else is a free-text place name. Coordinate values are
/// never validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    /// Raw `lat=..&lon=..` query text, passed through unchanged.
    Coordinates(String),
    /// Free-text place name, sent as the `q` parameter.
    Name(String),
}

impl LocationQuery {
    pub fn classify(raw: &str) -> Self {
        if raw.contains("lat=") && raw.contains("lon=") {
            LocationQuery::Coordinates(raw.to_string())
        } else {
            LocationQuery::Name(raw.to_string())
        }
    }
}

/// Normalized "current conditions plus forecast" record for one lookup.
///
/// All temperatures are metric as received from the provider; timestamps are
/// seconds since epoch. Unit conversion happens at display time only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub weather_code: i64,
    pub observed_at: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub forecast: Vec<DailyForecast>,
}

/// One aggregated forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Short local-time weekday label, e.g. "Mon". Grouping/display key only.
    pub day: String,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    /// Most frequent condition code among the day's entries.
    pub weather_code: i64,
    /// Timestamp of the first forecast entry seen for this day.
    pub dt: i64,
}

/// Temperature unit preference for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    /// Convert a stored metric temperature into this unit.
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            Unit::Celsius => celsius,
            Unit::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_key_is_classified_as_coordinates() {
        let q = LocationQuery::classify("lat=40.7&lon=-74.0");
        assert_eq!(q, LocationQuery::Coordinates("lat=40.7&lon=-74.0".to_string()));
    }

    #[test]
    fn place_name_is_classified_as_name() {
        let q = LocationQuery::classify("New York");
        assert_eq!(q, LocationQuery::Name("New York".to_string()));
    }

    #[test]
    fn key_with_only_one_marker_is_a_name() {
        // Both markers are required for the coordinate form.
        assert_eq!(
            LocationQuery::classify("lat=40.7"),
            LocationQuery::Name("lat=40.7".to_string())
        );
        assert_eq!(
            LocationQuery::classify("lon=-74.0"),
            LocationQuery::Name("lon=-74.0".to_string())
        );
    }

    #[test]
    fn fahrenheit_conversion_is_exact_affine() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert_eq!(celsius_to_fahrenheit(10.0), 50.0);
    }

    #[test]
    fn fahrenheit_roundtrip_within_tolerance() {
        for celsius in [-40.0, -7.3, 0.0, 12.6, 35.1, 100.0] {
            let back = fahrenheit_to_celsius(celsius_to_fahrenheit(celsius));
            assert!((back - celsius).abs() < 1e-9, "roundtrip drifted for {celsius}");
        }
    }

    #[test]
    fn unit_applies_conversion_only_for_fahrenheit() {
        assert_eq!(Unit::Celsius.from_celsius(21.5), 21.5);
        assert!((Unit::Fahrenheit.from_celsius(21.5) - 70.7).abs() < 1e-9);
    }
}
