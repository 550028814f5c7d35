use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type WeatherResult<T> = Result<T, WeatherError>;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to {action} `{path}`: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{url} : {source}")]
    InvalidObservations {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{url} : No observations")]
    NoObservations { url: String },

    #[error("station line {line}: {reason}")]
    InvalidStation { line: usize, reason: String },

    #[error("failed to encode GeoJSON: {0}")]
    Encode(#[from] serde_json::Error),
}

impl WeatherError {
    pub(crate) fn http(url: &str, source: reqwest::Error) -> Self {
        WeatherError::Http {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        WeatherError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
