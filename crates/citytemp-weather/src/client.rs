//! OpenWeatherMap client: point lookup by city name and box lookup by
//! bounding coordinates.
//!
//! Each call is a single request with no retry. The free tier caps how many
//! requests an API key may make; a 429 surfaces as
//! [`WeatherError::RateLimited`] and is left to the caller.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::error::WeatherError;
use crate::geo::DEFAULT_ZOOM;
use crate::types::*;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("citytemp/", env!("CARGO_PKG_VERSION"));

/// Everything the client needs, fixed at construction.
#[derive(Clone)]
pub struct WeatherSettings {
    pub api_key: String,
    pub base_url: String,
    pub units: Units,
    pub timeout: Duration,
    pub zoom: u32,
}

impl WeatherSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            zoom: DEFAULT_ZOOM,
        }
    }
}

// Keep the key out of logs and panics.
impl std::fmt::Debug for WeatherSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .field("timeout", &self.timeout)
            .field("zoom", &self.zoom)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    name: Option<String>,
    coord: CoordBlock,
    main: MainBlock,
}

#[derive(Debug, Deserialize)]
struct CoordBlock {
    lon: f64,
    lat: f64,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct BoxResponse {
    #[serde(default)]
    list: Vec<BoxEntry>,
}

#[derive(Debug, Deserialize)]
struct BoxEntry {
    name: String,
    main: Option<MainBlock>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    settings: WeatherSettings,
}

impl WeatherClient {
    pub fn new(settings: WeatherSettings) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, settings })
    }

    pub fn units(&self) -> Units {
        self.settings.units
    }

    /// Current temperature and coordinates of a city.
    ///
    /// Name collisions are resolved by the service; the first match wins.
    #[instrument(skip(self), level = "info")]
    pub async fn current_by_name(&self, name: &str) -> Result<CityReading, WeatherError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WeatherError::InvalidRequest("city name is empty".into()));
        }

        let url = format!("{}/data/2.5/weather", self.base_url());
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", name),
                ("appid", self.settings.api_key.as_str()),
                ("units", self.settings.units.as_query()),
            ])
            .send()
            .await?;

        let body = match self.handle_response::<CurrentWeatherResponse>(response).await {
            Err(WeatherError::NotFound(_)) => return Err(WeatherError::NotFound(name.to_string())),
            other => other?,
        };

        let reading = CityReading {
            name: body.name.filter(|n| !n.is_empty()).unwrap_or_else(|| name.to_string()),
            coordinates: Coordinates {
                longitude: body.coord.lon,
                latitude: body.coord.lat,
            },
            temperature: body.main.temp,
            units: self.settings.units,
        };

        tracing::debug!("Resolved {} to {:?}", name, reading.coordinates);
        Ok(reading)
    }

    /// Temperatures of every city the service knows inside `bbox`.
    ///
    /// At most `zoom`-limited results come back. Entries without a
    /// temperature are dropped; an empty result is an error.
    #[instrument(skip(self), level = "info")]
    pub async fn cities_in_box(&self, bbox: BoundingBox) -> Result<RegionSample, WeatherError> {
        let url = format!("{}/data/2.5/box/city", self.base_url());
        let bbox_param = bbox.to_query(self.settings.zoom);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("bbox", bbox_param.as_str()),
                ("appid", self.settings.api_key.as_str()),
                ("units", self.settings.units.as_query()),
            ])
            .send()
            .await?;

        let body = match self.handle_response::<BoxResponse>(response).await {
            Err(WeatherError::NotFound(_)) => return Err(WeatherError::EmptyRegion(bbox_param)),
            other => other?,
        };

        let total = body.list.len();
        let stations: Vec<StationReading> = body
            .list
            .into_iter()
            .filter_map(|entry| {
                entry.main.map(|main| StationReading {
                    name: entry.name,
                    temperature: main.temp,
                })
            })
            .collect();

        if stations.len() < total {
            tracing::debug!(
                "Dropped {} stations without a temperature",
                total - stations.len()
            );
        }

        if stations.is_empty() {
            return Err(WeatherError::EmptyRegion(bbox_param));
        }

        tracing::debug!("Box {} returned {} stations", bbox_param, stations.len());
        Ok(RegionSample { bbox, stations })
    }

    fn base_url(&self) -> &str {
        self.settings.base_url.trim_end_matches('/')
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            return response.json().await.map_err(|e| {
                WeatherError::Parse(format!("JSON parse error: {}", e.without_url()))
            });
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or(text);

        match status.as_u16() {
            401 => Err(WeatherError::InvalidApiKey),
            404 => Err(WeatherError::NotFound(message)),
            429 => Err(WeatherError::RateLimited),
            code => Err(WeatherError::Api {
                status: code,
                message,
            }),
        }
    }
}
