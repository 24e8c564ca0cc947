mod cli;
mod commands;
mod config;
mod cover;
mod error;
mod input;
mod metadata;
mod organize;
mod pipeline;
mod timeline;
mod tools;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose || cli.debug {
        "m4bmerge=debug"
    } else {
        "m4bmerge=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    commands::build::run(&cli)?;

    Ok(())
}
