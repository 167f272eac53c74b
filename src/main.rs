use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod actions;
mod cli;
mod repl;
mod report;

// Lookups run one after another; a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();

    citytemp_core::init(cli.verbose)?;
    tracing::info!("CityTemp started");

    cli.run().await
}
