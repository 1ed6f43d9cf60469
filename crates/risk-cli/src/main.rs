//! Risk adjustment scoring binary.

use std::io;

use clap::Parser;
use risk_cli::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the JSON results
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!("Reference data root: {}", cli.data_path.display());

    if let Err(e) = risk_cli::run(&cli, io::stdin().lock(), io::stdout().lock()) {
        tracing::error!("{}", e);
        return Err(e.into());
    }

    Ok(())
}
