//! Text rendering of lookup results for the terminal.

use citytemp_weather::{City, CityReading, RegionSample, Units, WeatherError};

/// A batch entry that could not be resolved
#[derive(Debug)]
pub struct Unresolved {
    pub name: String,
    pub error: WeatherError,
}

pub fn reading_line(reading: &CityReading) -> String {
    format!(
        "{} ({:.4}, {:.4}): {:.1}{}",
        reading.name,
        reading.coordinates.latitude,
        reading.coordinates.longitude,
        reading.temperature,
        reading.units.symbol()
    )
}

pub fn region_line(city: &City, sample: &RegionSample, average: f64) -> String {
    format!(
        "Average over {} stations within {} km of {}: {:.1}{}",
        sample.stations.len(),
        city.query().radius_km(),
        city.query().name(),
        average,
        city.reading().units.symbol()
    )
}

/// One line per city, in the order given. `with_region` appends the
/// cached region average or marks it unavailable.
pub fn batch_lines(cities: &[City], with_region: bool) -> Vec<String> {
    cities
        .iter()
        .map(|city| {
            if !with_region {
                return city.to_string();
            }
            match city.cached_average() {
                Some(avg) => format!(
                    "{} | area average: {:.1}{}",
                    city,
                    avg,
                    city.reading().units.symbol()
                ),
                None => format!("{} | area average: unavailable", city),
            }
        })
        .collect()
}

/// Unresolved entries, keeping "not found" apart from service failures.
pub fn unresolved_lines(unresolved: &[Unresolved]) -> Vec<String> {
    unresolved
        .iter()
        .map(|u| {
            if u.error.is_not_found() {
                format!("{}: not found", u.name)
            } else {
                format!("{}: lookup failed ({})", u.name, u.error.user_message())
            }
        })
        .collect()
}

pub fn unit_hint(units: Units) -> &'static str {
    match units {
        Units::Standard => "temperatures in Kelvin",
        Units::Metric => "temperatures in Celsius",
        Units::Imperial => "temperatures in Fahrenheit",
    }
}
