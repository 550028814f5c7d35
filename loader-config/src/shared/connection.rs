use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::sync::LazyLock;

use crate::Config;

const APP_NAME_LOADER: &str = "gnaf_loader";

/// Session settings applied to every loader connection. Statements and locks never time out.
pub static LOADER_SESSION_OPTIONS: LazyLock<PgConnectionOptions> =
    LazyLock::new(|| PgConnectionOptions {
        datestyle: "ISO".to_string(),
        client_encoding: "UTF8".to_string(),
        timezone: "UTC".to_string(),
        statement_timeout: 0,
        lock_timeout: 0,
        application_name: APP_NAME_LOADER.to_string(),
    });

/// Postgres runtime parameters sent in the startup packet.
#[derive(Debug, Clone)]
pub struct PgConnectionOptions {
    pub datestyle: String,
    pub client_encoding: String,
    pub timezone: String,
    /// Milliseconds, `0` disables the timeout.
    pub statement_timeout: u32,
    /// Milliseconds, `0` disables the timeout.
    pub lock_timeout: u32,
    pub application_name: String,
}

impl PgConnectionOptions {
    pub fn to_key_value_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("datestyle".to_string(), self.datestyle.clone()),
            ("client_encoding".to_string(), self.client_encoding.clone()),
            ("timezone".to_string(), self.timezone.clone()),
            ("statement_timeout".to_string(), self.statement_timeout.to_string()),
            ("lock_timeout".to_string(), self.lock_timeout.to_string()),
            ("application_name".to_string(), self.application_name.clone()),
        ]
    }
}

/// Connection details for the target PostGIS database.
#[derive(Debug, Clone, Deserialize)]
pub struct PgConnectionConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: Option<SecretString>,
    #[serde(default)]
    pub tls: TlsConfig,
}

impl Config for PgConnectionConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &[];
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub trusted_root_certs: String,
    #[serde(default)]
    pub enabled: bool,
}

impl TlsConfig {
    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Builds driver connect options, with or without the configured database name.
pub trait IntoConnectOptions<Output> {
    fn without_db(&self, options: Option<&PgConnectionOptions>) -> Output;
    fn with_db(&self, options: Option<&PgConnectionOptions>) -> Output;
}

impl IntoConnectOptions<PgConnectOptions> for PgConnectionConfig {
    fn without_db(&self, options: Option<&PgConnectionOptions>) -> PgConnectOptions {
        let ssl_mode = if self.tls.enabled {
            PgSslMode::VerifyFull
        } else {
            PgSslMode::Prefer
        };

        let mut connect_options = PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .ssl_mode(ssl_mode);

        if self.tls.enabled && !self.tls.trusted_root_certs.is_empty() {
            connect_options = connect_options
                .ssl_root_cert_from_pem(self.tls.trusted_root_certs.clone().into_bytes());
        }

        if let Some(password) = &self.password {
            connect_options = connect_options.password(password.expose_secret());
        }

        if let Some(opts) = options {
            connect_options = connect_options.options(opts.to_key_value_pairs());
        }

        connect_options
    }

    fn with_db(&self, options: Option<&PgConnectionOptions>) -> PgConnectOptions {
        let connect_options: PgConnectOptions = self.without_db(options);
        connect_options.database(&self.name)
    }
}
