mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let config = loueur_store::Config::load().context("failed to load configuration")?;
    tracing::debug!(command = cli.command.name(), "dispatching command");

    commands::dispatch(cli.command, &cli.global, &config)
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "loueur=info",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Logs go to stderr; stdout carries the JSON output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
