use anyhow::{Context, Result};
use citytemp_weather::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use citytemp_weather::geo::DEFAULT_ZOOM;
use citytemp_weather::{Units, WeatherSettings, DEFAULT_RADIUS_KM};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the OpenWeatherMap API key
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Environment variable overriding the service base URL
pub const BASE_URL_ENV: &str = "CITYTEMP_BASE_URL";

/// Radii above this distort badly under the fixed km-per-degree factor
const LARGE_RADIUS_KM: f64 = 1000.0;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather service settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// API key; normally supplied through `WEATHER_API_KEY` instead of the file
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Service root, e.g. https://api.openweathermap.org
    pub base_url: String,

    /// Unit system for temperatures
    pub units: Units,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Result limit passed to the box lookup
    pub zoom: u32,

    /// Radius used for queries that do not give one
    pub default_radius_km: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::Metric,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            zoom: DEFAULT_ZOOM,
            default_radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used if present and defaults otherwise. A `.env` file in the working
    /// directory is loaded first, then environment overrides are applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Validate, logging warnings and failing on errors.
    pub fn into_validated(self) -> Result<Self> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(self)
    }

    fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.weather.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.weather.base_url = url.trim().to_string();
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();
        let weather = &self.weather;

        self.validate_url(&weather.base_url, "weather.base_url", &mut result);

        match weather.api_key.as_deref() {
            None | Some("") => result.add_error(
                "weather.api_key",
                format!("No API key configured; set {}", API_KEY_ENV),
            ),
            _ => {}
        }

        if weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        } else if weather.timeout_secs > 300 {
            result.add_warning("weather.timeout_secs", "Timeout is unusually long (>300s)");
        }

        if weather.zoom == 0 {
            result.add_error("weather.zoom", "Zoom must be greater than 0");
        }

        if !weather.default_radius_km.is_finite() || weather.default_radius_km < 0.0 {
            result.add_error(
                "weather.default_radius_km",
                "Default radius must be a non-negative number",
            );
        } else if weather.default_radius_km > LARGE_RADIUS_KM {
            result.add_warning(
                "weather.default_radius_km",
                "Radius over 1000 km; the km-to-degree conversion is inaccurate at this scale",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Settings for the weather client. Fails when no API key is set.
    pub fn weather_settings(&self) -> Result<WeatherSettings, ConfigError> {
        let api_key = self
            .weather
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingSetting(API_KEY_ENV.to_string()))?;

        Ok(WeatherSettings {
            api_key,
            base_url: self.weather.base_url.clone(),
            units: self.weather.units,
            timeout: Duration::from_secs(self.weather.timeout_secs),
            zoom: self.weather.zoom,
        })
    }

    /// Default location of the configuration file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("citytemp").join("config.toml"))
    }
}
