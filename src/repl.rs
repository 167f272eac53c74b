//! Interactive prompt.
//!
//! Each line is classified into one of the query kinds, run, and the loop
//! returns to the prompt until a quit token is entered or stdin closes.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use citytemp_core::AppError;
use citytemp_weather::batch::{is_batch_path, FIELD_DELIMITER};
use citytemp_weather::{parse_line, BatchError, CityQuery, WeatherClient};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{actions, report};

const QUIT_TOKENS: [&str; 3] = ["q", "quit", "exit"];

/// One line of interactive input
#[derive(Debug, PartialEq)]
pub enum Input {
    Empty,
    Exit,
    Single(String),
    Range(CityQuery),
    Batch(PathBuf),
}

impl Input {
    /// Classify a line: batch file, `name;radius`, quit token or bare name.
    pub fn parse(line: &str, default_radius_km: f64) -> Result<Self, BatchError> {
        let line = line.trim();

        if line.is_empty() {
            return Ok(Self::Empty);
        }
        if QUIT_TOKENS.iter().any(|t| line.eq_ignore_ascii_case(t)) {
            return Ok(Self::Exit);
        }
        if is_batch_path(line) {
            return Ok(Self::Batch(PathBuf::from(line)));
        }
        if line.contains(FIELD_DELIMITER) {
            return parse_line(line, 1, default_radius_km).map(Self::Range);
        }
        Ok(Self::Single(line.to_string()))
    }
}

pub async fn run(client: &WeatherClient, default_radius_km: f64) -> Result<()> {
    println!(
        "Enter a city, `city;radius_km`, a .txt file of cities, or `q` to quit ({}).",
        report::unit_hint(client.units())
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = match Input::parse(&line, default_radius_km) {
            Ok(input) => input,
            Err(BatchError::ParseFailure { reason, .. }) => {
                eprintln!("Invalid input: {}", reason);
                continue;
            }
            Err(e) => {
                eprintln!("{}", e.user_message());
                continue;
            }
        };

        let outcome = match input {
            Input::Empty => continue,
            Input::Exit => break,
            Input::Single(name) => actions::current(client, &name).await,
            Input::Range(query) => actions::region(client, query).await,
            Input::Batch(path) => {
                actions::batch(client, &path, false, default_radius_km).await
            }
        };

        if let Err(e) = outcome {
            report_error(&e);
        }
    }

    Ok(())
}

/// Print the short message; the full chain goes to the log.
pub fn report_error(err: &AppError) {
    tracing::debug!("{:?}", err);
    match err {
        AppError::Batch(BatchError::ParseFailure { .. }) => eprintln!("{}", err),
        _ => eprintln!("{}", err.user_message()),
    }
}
