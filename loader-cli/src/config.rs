use anyhow::{Context, Result};
use loader_config::load_config;
use loader_config::shared::LoaderConfig;

/// Loads the configuration, applies the command line overrides and validates the result.
pub(crate) fn load_loader_config(max_processes: Option<u16>) -> Result<LoaderConfig> {
    let mut config =
        load_config::<LoaderConfig>().context("failed to load the loader configuration")?;

    if let Some(max_processes) = max_processes {
        config.max_processes = max_processes;
    }

    config
        .validate()
        .context("invalid loader configuration")?;

    Ok(config)
}
