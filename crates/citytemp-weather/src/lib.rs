//! City temperature lookups for CityTemp
//!
//! Wraps the OpenWeatherMap current-weather and box endpoints, derives
//! square regions around a city and averages their temperatures. Also
//! parses `name;radius` batch lists.

pub mod aggregate;
pub mod batch;
pub mod city;
pub mod client;
pub mod error;
pub mod geo;
pub mod types;

pub use aggregate::{mean, AggregateError};
pub use batch::{load_batch, parse_batch, parse_line, BatchError};
pub use city::{City, RegionError};
pub use client::{WeatherClient, WeatherSettings};
pub use error::WeatherError;
pub use types::*;
