//! A resolved city and its lazily fetched surrounding region.

use std::fmt;

use crate::aggregate::AggregateError;
use crate::client::WeatherClient;
use crate::error::WeatherError;
use crate::types::{BoundingBox, CityQuery, CityReading, RegionSample};

/// Failure computing a region average: either the lookup or the mean.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    #[error(transparent)]
    Lookup(#[from] WeatherError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl RegionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Lookup(e) => e.user_message(),
            Self::Aggregate(e) => e.user_message(),
        }
    }
}

/// Query plus point reading. The region sample is fetched on first use and
/// kept for the lifetime of the value; it is never refreshed.
#[derive(Debug, Clone)]
pub struct City {
    query: CityQuery,
    reading: CityReading,
    region: Option<RegionSample>,
}

impl City {
    /// Resolve the query with one point lookup.
    pub async fn resolve(client: &WeatherClient, query: CityQuery) -> Result<Self, WeatherError> {
        let reading = client.current_by_name(query.name()).await?;
        Ok(Self::from_parts(query, reading))
    }

    pub fn from_parts(query: CityQuery, reading: CityReading) -> Self {
        Self {
            query,
            reading,
            region: None,
        }
    }

    pub fn query(&self) -> &CityQuery {
        &self.query
    }

    pub fn reading(&self) -> &CityReading {
        &self.reading
    }

    /// Box of `radius_km` around the reading's coordinates
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(self.reading.coordinates, self.query.radius_km())
    }

    /// Region sample, fetched with one box lookup the first time only.
    ///
    /// A failed lookup leaves the cache empty.
    pub async fn region(&mut self, client: &WeatherClient) -> Result<&RegionSample, WeatherError> {
        let sample = match self.region.take() {
            Some(sample) => sample,
            None => {
                let sample = client.cities_in_box(self.bounding_box()).await?;
                tracing::debug!(
                    "Cached {} stations around {}",
                    sample.stations.len(),
                    self.query.name()
                );
                sample
            }
        };

        Ok(self.region.insert(sample))
    }

    /// Mean temperature over the region around the city.
    pub async fn region_average(&mut self, client: &WeatherClient) -> Result<f64, RegionError> {
        let sample = self.region(client).await?;
        Ok(sample.average()?)
    }

    /// Average from an already fetched region, without any request
    pub fn cached_average(&self) -> Option<f64> {
        self.region.as_ref().and_then(|r| r.average().ok())
    }

    pub fn has_region(&self) -> bool {
        self.region.is_some()
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} with {} km square and now: {:.1}{}",
            self.query.name(),
            self.query.radius_km(),
            self.reading.temperature,
            self.reading.units.symbol()
        )
    }
}
