use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{WeatherError, WeatherResult};

/// One station reading. Every field of the feed entry is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub lat: f64,
    pub lon: f64,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ObservationFeed {
    observations: ObservationData,
}

#[derive(Debug, Deserialize)]
struct ObservationData {
    data: Vec<Value>,
}

/// Returns the most recent reading of a feed: the entry with `sort_order` 0, the last one if
/// several claim it.
pub fn latest_observation(url: &str, json: &str) -> WeatherResult<Observation> {
    let feed: ObservationFeed =
        serde_json::from_str(json).map_err(|source| invalid(url, source))?;

    let latest = feed
        .observations
        .data
        .into_iter()
        .rev()
        .find(|entry| entry.get("sort_order").and_then(Value::as_i64) == Some(0))
        .ok_or_else(|| WeatherError::NoObservations {
            url: url.to_string(),
        })?;

    serde_json::from_value(latest).map_err(|source| invalid(url, source))
}

fn invalid(url: &str, source: serde_json::Error) -> WeatherError {
    WeatherError::InvalidObservations {
        url: url.to_string(),
        source,
    }
}
