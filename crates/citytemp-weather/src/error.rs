//! Lookup failures from the weather service.

use thiserror::Error;

/// Everything that can go wrong resolving a city or a region.
///
/// "Not found" and transport failures are separate variants so callers can
/// tell an unknown city from an unreachable service.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    NotFound(String),

    #[error("No cities found inside the bounding box {0}")]
    EmptyRegion(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Request quota exceeded")]
    RateLimited,

    #[error("Weather API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(reqwest::Error),
}

// reqwest puts the request URL in its errors, and the URL carries `appid`.
impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.without_url())
    }
}

impl WeatherError {
    /// User-friendly error message for terminal display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "City not found. Check the spelling and try again.",
            Self::EmptyRegion(_) => "No weather stations found in that area. Try a larger radius.",
            Self::InvalidApiKey => "Weather API key is invalid. Check WEATHER_API_KEY.",
            Self::RateLimited => {
                "Weather service request quota exceeded. Please wait before trying again."
            }
            Self::Api { status, .. } if *status >= 500 => {
                "Weather service is experiencing issues. Please try again later."
            }
            Self::Api { .. } => "Weather service rejected the request.",
            Self::InvalidRequest(_) => "Invalid request. Check the city name.",
            Self::Parse(_) => "Received an unexpected response from the weather service.",
            Self::Network(e) if e.is_timeout() => "The request timed out. Please try again.",
            Self::Network(_) => "Unable to reach the weather service. Check your connection.",
        }
    }

    /// The service answered but had no data for the request.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::EmptyRegion(_))
    }

    /// The request never got a usable answer from the service.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
