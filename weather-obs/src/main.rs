//! `weather-obs` binary: scrapes the latest BoM observations into GeoJSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use loader_telemetry::tracing::init_tracing;
use tracing::info;
use weather_obs::download::{DEFAULT_DOWNLOAD_WORKERS, ObservationClient};
use weather_obs::links::STATES;
use weather_obs::{ScrapeSettings, scrape};

#[derive(Debug, Parser)]
#[command(
    name = "weather-obs",
    about = "Downloads the latest BoM weather observations of every station"
)]
struct Args {
    /// Extracted `stations.txt` from the BoM site list archive
    #[arg(long)]
    stations: PathBuf,

    /// Directory receiving the GeoJSON layers, the URL list and the raw feeds
    #[arg(long, default_value = "data")]
    output_dir: PathBuf,

    #[arg(long, default_value = "http://www.bom.gov.au")]
    base_url: String,

    /// States to scrape
    #[arg(long = "state", default_values_t = STATES.map(String::from))]
    states: Vec<String>,

    /// Parallel feed downloads
    #[arg(long, default_value_t = DEFAULT_DOWNLOAD_WORKERS)]
    workers: usize,

    /// Also write a debug log to `{log_dir}/weather-obs.log`
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"), args.log_dir.as_deref())?;

    info!("start weather obs download");

    let client = ObservationClient::new(reqwest::Client::new(), &args.base_url);
    let settings = ScrapeSettings {
        stations_file: args.stations,
        output_dir: args.output_dir,
        states: args.states,
        workers: args.workers,
    };

    let summary = scrape(&client, &settings)
        .await
        .context("weather observation scrape failed")?;

    info!(
        stations = summary.stations,
        observation_urls = summary.observation_urls,
        observations = summary.observations,
        "finished successfully"
    );

    Ok(())
}
