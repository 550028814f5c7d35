//! `gnaf-loader` binary.
//!
//! Runs SQL scripts, shell commands and shapefile imports against the configured database on a
//! bounded worker pool. Exits unsuccessfully when any job fails.

use std::time::Instant;

use anyhow::{Result, bail};
use clap::Parser;
use loader_config::shared::LoaderConfig;
use loader_telemetry::tracing::init_tracing;
use tracing::info;

use crate::cli::{Cli, Command};
use crate::config::load_loader_config;

mod cli;
mod commands;
mod config;
mod manifest;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_loader_config(cli.max_processes)?;

    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"), config.log_dir.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(cli.command, config))
}

async fn async_main(command: Command, config: LoaderConfig) -> Result<()> {
    let start = Instant::now();
    info!(
        max_processes = config.max_processes,
        database = %config.pg_connection.name,
        "starting gnaf-loader"
    );

    let report = command.run(&config).await?;

    info!(elapsed = ?start.elapsed(), "gnaf-loader finished");

    if !report.is_success() {
        bail!(
            "{} of {} jobs failed and {} did not report a result",
            report.failures.len(),
            report.submitted,
            report.lost
        );
    }

    Ok(())
}
