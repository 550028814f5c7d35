//! Global `tracing` subscriber setup shared by the loader binaries.
//!
//! Console output is filtered by `RUST_LOG` and defaults to `info`. When a log directory is
//! given, a second, non-ANSI layer records everything from `debug` up into
//! `{log_dir}/{app_name}.log` through a non-blocking writer.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{Layer, fmt};

const DEFAULT_CONSOLE_DIRECTIVE: &str = "info";

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to create log directory `{path}`: {source}")]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install the global subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Keeps the background log writer alive. Buffered lines are flushed when it is dropped.
#[must_use = "dropping the flusher stops file logging"]
pub struct LogFlusher {
    _guard: Option<WorkerGuard>,
}

/// Installs the global subscriber.
pub fn init_tracing(app_name: &str, log_dir: Option<&Path>) -> Result<LogFlusher, TracingError> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_DIRECTIVE));
    let console_layer = fmt::layer().with_target(false).with_filter(console_filter);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| TracingError::LogDirectory {
                path: dir.to_path_buf(),
                source,
            })?;

            let appender = tracing_appender::rolling::never(dir, log_file_name(app_name));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(LevelFilter::DEBUG);

            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(LogFlusher { _guard: guard })
}

fn log_file_name(app_name: &str) -> String {
    format!("{app_name}.log")
}
