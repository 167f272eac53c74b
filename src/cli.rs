use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use citytemp_core::{AppError, Config};
use citytemp_weather::{CityQuery, Units, WeatherClient};
use clap::{ArgAction, Parser, Subcommand};

use crate::{actions, repl};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Unit system: metric, imperial or standard
    #[arg(long, global = true)]
    pub units: Option<Units>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Current temperature of a city
    Current {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Current temperature plus the average over a square region around it
    Region {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        /// Distance from the city to the edge of the square, in km
        #[arg(short, long)]
        radius: Option<f64>,
    },
    /// Resolve a `name;radius` list and print it sorted by temperature
    Batch {
        file: PathBuf,

        /// Sort by area average instead (one extra request per city)
        #[arg(long)]
        by_region: bool,
    },
    /// Prompt for queries until `q`
    Interactive,
}

impl Cli {
    /// Configuration with command-line overrides applied, validated.
    fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(timeout) = self.timeout {
            config.weather.timeout_secs = timeout;
        }
        if let Some(units) = self.units {
            config.weather.units = units;
        }

        config.into_validated()
    }

    pub async fn run(self) -> Result<ExitCode> {
        let config = self.load_config()?;
        let client = WeatherClient::new(config.weather_settings()?)?;
        let default_radius = config.weather.default_radius_km;

        let outcome = match self.command.unwrap_or(Command::Interactive) {
            Command::Current { name } => actions::current(&client, &name.join(" ")).await,
            Command::Region { name, radius } => {
                match CityQuery::new(&name.join(" "), radius.unwrap_or(default_radius)) {
                    Ok(query) => actions::region(&client, query).await,
                    Err(e) => Err(AppError::from(e)),
                }
            }
            Command::Batch { file, by_region } => {
                actions::batch(&client, &file, by_region, default_radius).await
            }
            Command::Interactive => {
                repl::run(&client, default_radius).await?;
                Ok(())
            }
        };

        match outcome {
            Ok(()) => Ok(ExitCode::SUCCESS),
            Err(e) => {
                repl::report_error(&e);
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
