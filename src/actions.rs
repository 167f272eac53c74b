//! The three lookups the front ends offer: a single city, a city with its
//! region average, and a batch file. Every request is awaited in turn.

use std::path::Path;

use citytemp_core::AppError;
use citytemp_weather::batch::{sort_by_region_average, sort_by_temperature};
use citytemp_weather::{load_batch, City, CityQuery, WeatherClient};

use crate::report::{self, Unresolved};

/// Print the current temperature of one city.
pub async fn current(client: &WeatherClient, name: &str) -> Result<(), AppError> {
    let reading = client.current_by_name(name).await?;
    println!("{}", report::reading_line(&reading));
    Ok(())
}

/// Print the current temperature of a city and the average over its region.
pub async fn region(client: &WeatherClient, query: CityQuery) -> Result<(), AppError> {
    let mut city = City::resolve(client, query).await?;
    println!("{}", report::reading_line(city.reading()));

    let sample = city.region(client).await?.clone();
    let average = sample.average()?;
    println!("{}", report::region_line(&city, &sample, average));
    Ok(())
}

/// Resolve every city in a batch file and print them coldest first.
///
/// A malformed or missing file fails before any request. Cities that fail
/// to resolve are listed after the sorted results. Lines without a radius
/// get `default_radius_km`.
pub async fn batch(
    client: &WeatherClient,
    path: &Path,
    by_region: bool,
    default_radius_km: f64,
) -> Result<(), AppError> {
    let queries = load_batch(path, default_radius_km).await?;
    tracing::info!("Resolving {} cities from {}", queries.len(), path.display());

    let mut cities = Vec::with_capacity(queries.len());
    let mut unresolved = Vec::new();

    for query in queries {
        let name = query.name().to_string();
        match City::resolve(client, query).await {
            Ok(city) => cities.push(city),
            Err(error) => {
                tracing::debug!("Failed to resolve {}: {}", name, error);
                unresolved.push(Unresolved { name, error });
            }
        }
    }

    if by_region {
        for city in &mut cities {
            if let Err(e) = city.region_average(client).await {
                tracing::warn!("No area average for {}: {}", city.query().name(), e);
            }
        }
        sort_by_region_average(&mut cities);
    } else {
        sort_by_temperature(&mut cities);
    }

    for line in report::batch_lines(&cities, by_region) {
        println!("{}", line);
    }

    if !unresolved.is_empty() {
        eprintln!("Unresolved ({}):", unresolved.len());
        for line in report::unresolved_lines(&unresolved) {
            eprintln!("  {}", line);
        }
    }

    Ok(())
}
