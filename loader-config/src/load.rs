use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use config::builder::{ConfigBuilder, DefaultState};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::environment::Environment;

/// Directory holding configuration files, relative to the working directory.
const CONFIGURATION_DIR: &str = "configuration";

/// Extensions tried, in order, for every configuration file.
const CONFIG_FILE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "APP";

/// Separator between the prefix and the key in environment variables.
const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator for nested keys in environment variables (`APP_PG_CONNECTION__HOST`).
const ENV_SEPARATOR: &str = "__";

/// Separator for list values in environment variables.
const LIST_SEPARATOR: &str = ",";

/// Implemented by configuration roots that can be loaded with [`load_config`].
pub trait Config {
    /// Keys whose environment variable values are split on commas into lists.
    const LIST_PARSE_KEYS: &'static [&'static str];
}

/// Layers of configuration files, in the order they are merged.
#[derive(Debug, Clone, Copy)]
enum ConfigFileKind {
    /// Settings shared by every environment.
    Base,
    /// Overrides for one environment.
    Environment(Environment),
}

impl ConfigFileKind {
    fn stem(&self) -> Cow<'static, str> {
        match self {
            ConfigFileKind::Base => Cow::Borrowed("base"),
            ConfigFileKind::Environment(env) => Cow::Borrowed(env.as_str()),
        }
    }
}

impl fmt::Display for ConfigFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFileKind::Base => f.write_str("base configuration"),
            ConfigFileKind::Environment(env) => write!(f, "{env} environment configuration"),
        }
    }
}

/// Errors raised while reading configuration files and overrides.
#[derive(Debug, Error)]
pub enum LoadConfigError {
    /// Failed to determine the current working directory.
    #[error("failed to determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// The configuration directory does not exist.
    #[error("configuration directory `{0}` does not exist")]
    MissingConfigurationDirectory(PathBuf),

    /// No file with a supported extension was found for a required layer.
    #[error("could not locate {kind_description} in `{directory}`; attempted: {attempted}")]
    ConfigurationFileMissing {
        kind_description: String,
        directory: PathBuf,
        attempted: String,
    },

    /// A configuration file exists but could not be read or parsed.
    #[error("failed to load {kind_description} from `{path}`: {source}")]
    ConfigurationFileLoad {
        kind_description: String,
        path: PathBuf,
        source: config::ConfigError,
    },

    /// The merged configuration does not match the target type.
    #[error("failed to deserialize configuration: {0}")]
    Deserialization(#[source] config::ConfigError),

    /// `APP_ENVIRONMENT` holds an unknown environment name.
    #[error("failed to determine runtime environment: {0}")]
    Environment(#[from] io::Error),

    /// Merging the file and environment sources failed.
    #[error("failed to build configuration: {0}")]
    Builder(#[source] config::ConfigError),
}

/// Loads configuration from `./configuration` for the environment named by `APP_ENVIRONMENT`.
///
/// `base.(yaml|yml|json)` is required. `{environment}.(yaml|yml|json)` is merged on top when
/// present, and `APP_`-prefixed environment variables are applied last, with nested keys
/// separated by double underscores.
pub fn load_config<T>() -> Result<T, LoadConfigError>
where
    T: Config + DeserializeOwned,
{
    let base_path = std::env::current_dir().map_err(LoadConfigError::CurrentDir)?;
    let environment = Environment::load()?;

    load_config_from(&base_path.join(CONFIGURATION_DIR), environment)
}

/// Loads configuration from an explicit directory and environment.
pub fn load_config_from<T>(directory: &Path, environment: Environment) -> Result<T, LoadConfigError>
where
    T: Config + DeserializeOwned,
{
    if !directory.is_dir() {
        return Err(LoadConfigError::MissingConfigurationDirectory(
            directory.to_path_buf(),
        ));
    }

    let base_file = find_configuration_file(directory, ConfigFileKind::Base)?.ok_or_else(|| {
        missing_file_error(directory, ConfigFileKind::Base)
    })?;

    let builder = config::Config::builder().add_source(config::File::from(base_file.clone()));
    validate_configuration_source(&builder, ConfigFileKind::Base, &base_file)?;

    let environment_kind = ConfigFileKind::Environment(environment);
    let builder = match find_configuration_file(directory, environment_kind)? {
        Some(environment_file) => {
            let builder = builder.add_source(config::File::from(environment_file.clone()));
            validate_configuration_source(&builder, environment_kind, &environment_file)?;
            builder
        }
        None => builder,
    };

    let mut environment_source = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true);

    if !T::LIST_PARSE_KEYS.is_empty() {
        environment_source = environment_source.list_separator(LIST_SEPARATOR);
        for key in T::LIST_PARSE_KEYS {
            environment_source = environment_source.with_list_parse_key(key);
        }
    }

    let settings = builder
        .add_source(environment_source)
        .build()
        .map_err(LoadConfigError::Builder)?;

    settings
        .try_deserialize::<T>()
        .map_err(LoadConfigError::Deserialization)
}

/// Returns the first existing file for `kind` among the supported extensions.
fn find_configuration_file(
    directory: &Path,
    kind: ConfigFileKind,
) -> Result<Option<PathBuf>, LoadConfigError> {
    let stem = kind.stem();

    for extension in CONFIG_FILE_EXTENSIONS {
        let path = directory.join(format!("{stem}.{extension}"));
        if path.is_file() {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

fn missing_file_error(directory: &Path, kind: ConfigFileKind) -> LoadConfigError {
    let stem = kind.stem();
    let attempted = CONFIG_FILE_EXTENSIONS
        .iter()
        .map(|extension| format!("`{}`", directory.join(format!("{stem}.{extension}")).display()))
        .collect::<Vec<_>>()
        .join(", ");

    LoadConfigError::ConfigurationFileMissing {
        kind_description: kind.to_string(),
        directory: directory.to_path_buf(),
        attempted,
    }
}

fn validate_configuration_source(
    builder: &ConfigBuilder<DefaultState>,
    kind: ConfigFileKind,
    path: &Path,
) -> Result<(), LoadConfigError> {
    builder
        .clone()
        .build()
        .map(|_| ())
        .map_err(|source| LoadConfigError::ConfigurationFileLoad {
            kind_description: kind.to_string(),
            path: path.to_path_buf(),
            source,
        })
}
