//! Point feature collections for QA in a GIS.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::{WeatherError, WeatherResult};
use crate::observations::Observation;
use crate::stations::Station;

/// GDA94, the datum of the station list.
pub const STATIONS_EPSG: u32 = 4283;
/// WGS84, the datum of the observation feeds.
pub const OBSERVATIONS_EPSG: u32 = 4326;

pub fn stations_collection(stations: &[Station]) -> WeatherResult<Value> {
    let features = stations
        .iter()
        .map(|station| point_feature(station.longitude, station.latitude, station))
        .collect::<WeatherResult<Vec<_>>>()?;

    Ok(feature_collection(STATIONS_EPSG, features))
}

pub fn observations_collection(observations: &[Observation]) -> WeatherResult<Value> {
    let features = observations
        .iter()
        .map(|observation| point_feature(observation.lon, observation.lat, observation))
        .collect::<WeatherResult<Vec<_>>>()?;

    Ok(feature_collection(OBSERVATIONS_EPSG, features))
}

pub async fn write_geojson(path: &Path, collection: &Value) -> WeatherResult<()> {
    let bytes = serde_json::to_vec_pretty(collection)?;

    tokio::fs::write(path, bytes)
        .await
        .map_err(|err| WeatherError::io("write", path, err))
}

fn point_feature<P>(x: f64, y: f64, properties: &P) -> WeatherResult<Value>
where
    P: Serialize,
{
    let properties = match serde_json::to_value(properties)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    Ok(json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [x, y] },
        "properties": properties,
    }))
}

fn feature_collection(epsg: u32, features: Vec<Value>) -> Value {
    json!({
        "type": "FeatureCollection",
        "crs": {
            "type": "name",
            "properties": { "name": format!("urn:ogc:def:crs:EPSG::{epsg}") },
        },
        "features": features,
    })
}
