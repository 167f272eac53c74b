pub mod config;
pub mod error;

pub use config::{Config, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError};

use anyhow::Result;

/// Initialize logging.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level
/// (0 = warn, 1 = info, 2+ = debug). Logs go to stderr so results on
/// stdout stay clean.
pub fn init(verbosity: u8) -> Result<()> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("CityTemp core initialized");
    Ok(())
}
