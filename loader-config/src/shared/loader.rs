use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::Config;
use crate::shared::PgConnectionConfig;

/// GDA94, the coordinate system the source shapefiles are published in.
pub const DEFAULT_SRID: u32 = 4283;

const DEFAULT_MAX_PROCESSES: u16 = 4;
const DEFAULT_SHP2PGSQL: &str = "shp2pgsql";

/// Reasons a loaded [`LoaderConfig`] is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("`max_processes` must be at least 1")]
    NoProcesses,

    #[error("schema `{0}` must not be empty")]
    EmptySchema(&'static str),

    #[error("`shapefile.shp2pgsql_path` must not be empty")]
    EmptyShp2PgsqlPath,
}

/// Root configuration of the `gnaf-loader` binary.
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderConfig {
    /// Size of the worker pool and of the database connection pool.
    #[serde(default = "default_max_processes")]
    pub max_processes: u16,
    /// Directory that relative SQL file names are resolved against.
    #[serde(default = "default_sql_dir")]
    pub sql_dir: PathBuf,
    /// When set, logs are also written to `{log_dir}/gnaf-loader.log`.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub schemas: SchemaConfig,
    #[serde(default)]
    pub shapefile: ShapefileConfig,
    pub pg_connection: PgConnectionConfig,
}

impl Config for LoaderConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &[];
}

impl LoaderConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_processes == 0 {
            return Err(ValidationError::NoProcesses);
        }

        self.schemas.validate()?;

        if self.shapefile.shp2pgsql_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyShp2PgsqlPath);
        }

        Ok(())
    }
}

/// Target schema names substituted into the canned SQL scripts.
///
/// The scripts are written against `raw_gnaf`, `raw_admin_bdys`, `gnaf` and `admin_bdys`;
/// a configured name replaces the canonical one, `None` leaves it untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    #[serde(default = "default_raw_gnaf")]
    pub raw_gnaf: Option<String>,
    #[serde(default = "default_raw_admin_bdys")]
    pub raw_admin_bdys: Option<String>,
    #[serde(default = "default_gnaf")]
    pub gnaf: Option<String>,
    #[serde(default = "default_admin_bdys")]
    pub admin_bdys: Option<String>,
}

impl SchemaConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let schemas = [
            ("raw_gnaf", &self.raw_gnaf),
            ("raw_admin_bdys", &self.raw_admin_bdys),
            ("gnaf", &self.gnaf),
            ("admin_bdys", &self.admin_bdys),
        ];

        for (key, value) in schemas {
            if value.as_deref().is_some_and(|name| name.trim().is_empty()) {
                return Err(ValidationError::EmptySchema(key));
            }
        }

        Ok(())
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            raw_gnaf: default_raw_gnaf(),
            raw_admin_bdys: default_raw_admin_bdys(),
            gnaf: default_gnaf(),
            admin_bdys: default_admin_bdys(),
        }
    }
}

/// Settings for shapefile ingestion through `shp2pgsql`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShapefileConfig {
    #[serde(default = "default_shp2pgsql_path")]
    pub shp2pgsql_path: PathBuf,
    #[serde(default = "default_srid")]
    pub srid: u32,
    /// Where `error_debug_*.sql` files are written when an import fails.
    #[serde(default = "default_debug_dir")]
    pub debug_dir: PathBuf,
}

impl Default for ShapefileConfig {
    fn default() -> Self {
        Self {
            shp2pgsql_path: default_shp2pgsql_path(),
            srid: default_srid(),
            debug_dir: default_debug_dir(),
        }
    }
}

fn default_max_processes() -> u16 {
    DEFAULT_MAX_PROCESSES
}

fn default_sql_dir() -> PathBuf {
    PathBuf::from("sql")
}

fn default_raw_gnaf() -> Option<String> {
    Some("raw_gnaf".to_string())
}

fn default_raw_admin_bdys() -> Option<String> {
    Some("raw_admin_bdys".to_string())
}

fn default_gnaf() -> Option<String> {
    Some("gnaf".to_string())
}

fn default_admin_bdys() -> Option<String> {
    Some("admin_bdys".to_string())
}

fn default_shp2pgsql_path() -> PathBuf {
    PathBuf::from(DEFAULT_SHP2PGSQL)
}

fn default_srid() -> u32 {
    DEFAULT_SRID
}

fn default_debug_dir() -> PathBuf {
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use crate::shared::TlsConfig;

    use super::*;

    fn config() -> LoaderConfig {
        LoaderConfig {
            max_processes: 6,
            sql_dir: PathBuf::from("sql"),
            log_dir: None,
            schemas: SchemaConfig::default(),
            shapefile: ShapefileConfig::default(),
            pg_connection: PgConnectionConfig {
                host: "localhost".to_string(),
                port: 5432,
                name: "geo".to_string(),
                username: "postgres".to_string(),
                password: None,
                tls: TlsConfig::disabled(),
            },
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn zero_processes_is_rejected() {
        let mut config = config();
        config.max_processes = 0;

        assert_eq!(config.validate(), Err(ValidationError::NoProcesses));
    }

    #[test]
    fn blank_schema_is_rejected() {
        let mut config = config();
        config.schemas.gnaf = Some("  ".to_string());

        assert_eq!(config.validate(), Err(ValidationError::EmptySchema("gnaf")));
    }

    #[test]
    fn unset_schema_is_allowed() {
        let mut config = config();
        config.schemas.admin_bdys = None;

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn shapefile_defaults_match_source_data() {
        let shapefile = ShapefileConfig::default();

        assert_eq!(shapefile.srid, 4283);
        assert_eq!(shapefile.shp2pgsql_path, PathBuf::from("shp2pgsql"));
    }
}
