mod cli;
mod commands;
mod progress;
mod tabs;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    notemark_logging::initialize(cli.log.into(), level);

    // Targets are handled one at a time, so a single-threaded runtime is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(commands::run(cli))
}
