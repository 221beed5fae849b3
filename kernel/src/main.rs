//! `duplex` binary: diff and resolve two files from the command line.

use anyhow::Context;
use clap::Parser;
use duplex_kernel::cli::{self, Cli};
use duplex_kernel::infrastructure::{config::Settings, telemetry::TelemetryBuilder};
use tracing::debug;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let mut telemetry = TelemetryBuilder::from_settings(&settings.telemetry);
    if let Some(level) = &cli.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    }
    telemetry.init()?;
    debug!(?settings, "configuration loaded");

    let stdout = std::io::stdout();
    cli::run(&cli, &settings, &mut stdout.lock())
}
