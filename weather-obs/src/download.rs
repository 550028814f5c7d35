use std::path::{Path, PathBuf};
use std::sync::Arc;

use loader::workers::WorkerPool;
use tracing::{debug, info, warn};

use crate::error::{WeatherError, WeatherResult};
use crate::links::{observation_urls, state_page_url};
use crate::observations::{Observation, latest_observation};

/// Parallel downloads used by the observation scraper.
pub const DEFAULT_DOWNLOAD_WORKERS: usize = 12;

/// HTTP side of the scraper.
#[derive(Debug, Clone)]
pub struct ObservationClient {
    client: reqwest::Client,
    base_url: Arc<str>,
}

impl ObservationClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_text(&self, url: &str) -> WeatherResult<String> {
        self.client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| WeatherError::http(url, err))?
            .text()
            .await
            .map_err(|err| WeatherError::http(url, err))
    }

    /// Collects the observation feed URLs of every state, in state order.
    pub async fn fetch_observation_urls(&self, states: &[String]) -> WeatherResult<Vec<String>> {
        let mut urls = Vec::new();

        for state in states {
            let page_url = state_page_url(&self.base_url, state);
            let html = self.get_text(&page_url).await?;
            let state_urls = observation_urls(&html, &self.base_url);

            debug!(state = %state, urls = state_urls.len(), "scraped observation links");
            urls.extend(state_urls);
        }

        Ok(urls)
    }

    /// Downloads one feed, keeps the raw JSON in `obs_dir` and returns its latest reading.
    pub async fn download_observation(
        &self,
        url: &str,
        obs_dir: &Path,
    ) -> WeatherResult<Observation> {
        let json = self.get_text(url).await?;

        let path = obs_dir.join(feed_file_name(url));
        tokio::fs::write(&path, &json)
            .await
            .map_err(|err| WeatherError::io("write", path, err))?;

        latest_observation(url, &json)
    }

    /// Downloads every feed on `pool`. Feeds that fail are logged and left out.
    pub async fn download_observations(
        &self,
        pool: &WorkerPool,
        urls: Vec<String>,
        obs_dir: &Path,
    ) -> Vec<Observation> {
        let client = self.clone();
        let obs_dir: Arc<PathBuf> = Arc::new(obs_dir.to_path_buf());

        let results = pool
            .run(urls, move |url: String| {
                let client = client.clone();
                let obs_dir = obs_dir.clone();
                async move { client.download_observation(&url, &obs_dir).await }
            })
            .await;

        if results.lost > 0 {
            warn!(
                lost = results.lost,
                submitted = results.submitted,
                "a download worker failed without reporting a result"
            );
        }

        let mut observations = Vec::with_capacity(results.results.len());
        for result in results.results {
            match result {
                Ok(observation) => observations.push(observation),
                Err(err) => warn!("Failed to parse {err}"),
            }
        }

        info!(
            submitted = results.submitted,
            downloaded = observations.len(),
            "downloaded observation feeds"
        );

        observations
    }
}

/// Last path segment of a feed URL.
fn feed_file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
