//! Centralized error types for CityTemp.
//!
//! Library errors from the weather crate convert into [`AppError`], which
//! carries a short `user_message()` for terminal output while the full
//! error chain goes to the log.

use citytemp_weather::{AggregateError, BatchError, RegionError, WeatherError};
use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Lookup failed: {0}")]
    Lookup(#[from] WeatherError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<RegionError> for AppError {
    fn from(err: RegionError) -> Self {
        match err {
            RegionError::Lookup(e) => AppError::Lookup(e),
            RegionError::Aggregate(e) => AppError::Aggregate(e),
        }
    }
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Lookup(e) => e.user_message(),
            AppError::Batch(e) => e.user_message(),
            AppError::Aggregate(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration file not found. Check the --config path.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => {
                "A required setting is missing. Is WEATHER_API_KEY set?"
            }
        }
    }
}
