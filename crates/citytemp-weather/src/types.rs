use serde::{Deserialize, Serialize};
use std::fmt;

use crate::batch::{BatchError, FIELD_DELIMITER};

/// Radius used when a query does not carry one
pub const DEFAULT_RADIUS_KM: f64 = 30.0;

/// Unit system requested from the weather service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Standard,
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Value of the `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Temperature suffix for display
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Standard => "K",
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }
}

impl std::str::FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "kelvin" => Ok(Self::Standard),
            "metric" | "celsius" => Ok(Self::Metric),
            "imperial" | "fahrenheit" => Ok(Self::Imperial),
            other => Err(format!("unknown unit system: {}", other)),
        }
    }
}

/// A city to look up, with the half-width of the square region around it.
///
/// Immutable once built. The name never contains the batch field delimiter,
/// so `to_line` output parses back into an identical query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityQuery {
    name: String,
    radius_km: f64,
}

impl CityQuery {
    /// Build a query, validating the name and radius.
    pub fn new(name: &str, radius_km: f64) -> Result<Self, BatchError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BatchError::parse(0, "city name is empty"));
        }
        if name.contains(FIELD_DELIMITER) {
            return Err(BatchError::parse(
                0,
                format!("city name must not contain '{}'", FIELD_DELIMITER),
            ));
        }
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(BatchError::parse(
                0,
                format!("radius must be a non-negative number, got {}", radius_km),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            radius_km,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Render as a batch file line (`name;radius`)
    pub fn to_line(&self) -> String {
        format!("{}{}{}", self.name, FIELD_DELIMITER, self.radius_km)
    }
}

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// Current temperature of a single city as reported by the point lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityReading {
    pub name: String,
    pub coordinates: Coordinates,
    pub temperature: f64,
    pub units: Units,
}

impl fmt::Display for CityReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1}{}",
            self.name,
            self.temperature,
            self.units.symbol()
        )
    }
}

/// Rectangle in longitude/latitude degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

/// One entity returned by the box lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReading {
    pub name: String,
    pub temperature: f64,
}

/// All readings inside a bounding box at the time of the request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSample {
    pub bbox: BoundingBox,
    pub stations: Vec<StationReading>,
}

impl RegionSample {
    pub fn temperatures(&self) -> Vec<f64> {
        self.stations.iter().map(|s| s.temperature).collect()
    }

    /// Arithmetic mean of every station temperature in the sample
    pub fn average(&self) -> Result<f64, crate::aggregate::AggregateError> {
        crate::aggregate::mean(&self.temperatures())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims_name() {
        let q = CityQuery::new("  Tver ", 30.0).unwrap();
        assert_eq!(q.name(), "Tver");
        assert_eq!(q.radius_km(), 30.0);
    }

    #[test]
    fn test_query_rejects_empty_name() {
        assert!(CityQuery::new("   ", 10.0).is_err());
    }

    #[test]
    fn test_query_rejects_delimiter_in_name() {
        let err = CityQuery::new("Tver;Moscow", 10.0).unwrap_err();
        assert!(matches!(err, BatchError::ParseFailure { .. }));
    }

    #[test]
    fn test_query_rejects_bad_radius() {
        assert!(CityQuery::new("Tver", -1.0).is_err());
        assert!(CityQuery::new("Tver", f64::NAN).is_err());
        assert!(CityQuery::new("Tver", f64::INFINITY).is_err());
        assert!(CityQuery::new("Tver", 0.0).is_ok());
    }

    #[test]
    fn test_query_to_line() {
        let q = CityQuery::new("Санкт-Петербург", 100.0).unwrap();
        assert_eq!(q.to_line(), "Санкт-Петербург;100");
    }

    #[test]
    fn test_units_parse_and_symbol() {
        assert_eq!("metric".parse::<Units>().unwrap(), Units::Metric);
        assert_eq!("Imperial".parse::<Units>().unwrap(), Units::Imperial);
        assert!("furlongs".parse::<Units>().is_err());
        assert_eq!(Units::Metric.symbol(), "°C");
        assert_eq!(Units::Standard.as_query(), "standard");
    }

    #[test]
    fn test_reading_display() {
        let reading = CityReading {
            name: "Tver".to_string(),
            coordinates: Coordinates {
                longitude: 35.9,
                latitude: 56.86,
            },
            temperature: -3.4,
            units: Units::Metric,
        };
        assert_eq!(reading.to_string(), "Tver: -3.4°C");
    }

    #[test]
    fn test_region_sample_average() {
        let sample = RegionSample {
            bbox: BoundingBox {
                lon_min: 0.0,
                lon_max: 1.0,
                lat_min: 0.0,
                lat_max: 1.0,
            },
            stations: vec![
                StationReading {
                    name: "A".into(),
                    temperature: 10.0,
                },
                StationReading {
                    name: "B".into(),
                    temperature: 20.0,
                },
            ],
        };
        assert_eq!(sample.average().unwrap(), 15.0);
    }
}
