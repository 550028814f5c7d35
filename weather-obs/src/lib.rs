//! Scraper for Bureau of Meteorology weather observations.
//!
//! Reads the station site list, collects the observation feed of every station from the state
//! observation pages, downloads the feeds in parallel and writes stations and latest readings
//! as GeoJSON point layers.

use std::path::{Path, PathBuf};
use std::time::Instant;

use loader::workers::WorkerPool;
use tracing::info;

use crate::download::ObservationClient;
use crate::error::{WeatherError, WeatherResult};
use crate::geojson::{observations_collection, stations_collection, write_geojson};
use crate::stations::parse_stations;

pub mod download;
pub mod error;
pub mod geojson;
pub mod links;
pub mod observations;
pub mod stations;

pub const OBSERVATION_URLS_FILE: &str = "weather_observations_urls.txt";
pub const STATIONS_FILE: &str = "weather_stations.geojson";
pub const OBSERVATIONS_FILE: &str = "weather_observations.geojson";
const OBS_DIR: &str = "obs";

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    /// Extracted `stations.txt` site list.
    pub stations_file: PathBuf,
    pub output_dir: PathBuf,
    pub states: Vec<String>,
    pub workers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub stations: usize,
    pub observation_urls: usize,
    pub observations: usize,
}

/// Runs the whole scrape, writing every output below `settings.output_dir`.
pub async fn scrape(
    client: &ObservationClient,
    settings: &ScrapeSettings,
) -> WeatherResult<ScrapeSummary> {
    let obs_dir = settings.output_dir.join(OBS_DIR);
    tokio::fs::create_dir_all(&obs_dir)
        .await
        .map_err(|err| WeatherError::io("create", &obs_dir, err))?;

    let start = Instant::now();
    let station_text = tokio::fs::read_to_string(&settings.stations_file)
        .await
        .map_err(|err| WeatherError::io("read", &settings.stations_file, err))?;
    let stations = parse_stations(&station_text);
    write_geojson(
        &settings.output_dir.join(STATIONS_FILE),
        &stations_collection(&stations)?,
    )
    .await?;
    info!(stations = stations.len(), elapsed = ?start.elapsed(), "got weather stations");

    let start = Instant::now();
    let urls = client.fetch_observation_urls(&settings.states).await?;
    write_text(&settings.output_dir.join(OBSERVATION_URLS_FILE), &urls.join("\n")).await?;
    info!(urls = urls.len(), elapsed = ?start.elapsed(), "got observation file list");

    let start = Instant::now();
    let observation_urls = urls.len();
    let pool = WorkerPool::new(settings.workers);
    let observations = client.download_observations(&pool, urls, &obs_dir).await;
    write_geojson(
        &settings.output_dir.join(OBSERVATIONS_FILE),
        &observations_collection(&observations)?,
    )
    .await?;
    info!(elapsed = ?start.elapsed(), "downloaded all observation files");

    Ok(ScrapeSummary {
        stations: stations.len(),
        observation_urls,
        observations: observations.len(),
    })
}

async fn write_text(path: &Path, text: &str) -> WeatherResult<()> {
    tokio::fs::write(path, text)
        .await
        .map_err(|err| WeatherError::io("write", path, err))
}
