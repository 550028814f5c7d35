use loader_config::shared::{IntoConnectOptions, PgConnectionConfig, TlsConfig};
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

/// Connection settings for a uniquely named database on the test server.
///
/// # Panics
///
/// Panics if the required `TESTS_DATABASE_*` variables are missing or malformed.
pub fn local_pg_connection_config() -> PgConnectionConfig {
    PgConnectionConfig {
        host: std::env::var("TESTS_DATABASE_HOST").expect("TESTS_DATABASE_HOST must be set"),
        port: std::env::var("TESTS_DATABASE_PORT")
            .expect("TESTS_DATABASE_PORT must be set")
            .parse()
            .expect("TESTS_DATABASE_PORT must be a valid port number"),
        name: Uuid::new_v4().to_string(),
        username: std::env::var("TESTS_DATABASE_USERNAME")
            .expect("TESTS_DATABASE_USERNAME must be set"),
        password: std::env::var("TESTS_DATABASE_PASSWORD")
            .ok()
            .map(Into::into),
        tls: TlsConfig::disabled(),
    }
}

/// A database created for one test. Call [`TestDatabase::drop_database`] when done.
pub struct TestDatabase {
    pub config: PgConnectionConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Creates a fresh database and connects a pool to it.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be reached or the database cannot be created.
    pub async fn new() -> Self {
        let config = local_pg_connection_config();

        let server_options: PgConnectOptions = config.without_db(None);
        let mut connection = PgConnection::connect_with(&server_options)
            .await
            .expect("Failed to connect to Postgres");
        connection
            .execute(&*format!(r#"create database "{}";"#, config.name))
            .await
            .expect("Failed to create database");

        let database_options: PgConnectOptions = config.with_db(None);
        let pool = PgPool::connect_with(database_options)
            .await
            .expect("Failed to connect to the test database");

        Self { config, pool }
    }

    /// Terminates remaining sessions and drops the database. Errors are only printed so cleanup
    /// never fails a test.
    pub async fn drop_database(self) {
        self.pool.close().await;

        let server_options: PgConnectOptions = self.config.without_db(None);
        let mut connection = match PgConnection::connect_with(&server_options).await {
            Ok(connection) => connection,
            Err(err) => {
                eprintln!("warning: failed to connect to Postgres for cleanup: {err}");
                return;
            }
        };

        let terminate = format!(
            "select pg_terminate_backend(pid) from pg_stat_activity \
             where datname = '{}' and pid <> pg_backend_pid();",
            self.config.name
        );
        if let Err(err) = connection.execute(&*terminate).await {
            eprintln!("warning: failed to terminate connections: {err}");
        }

        if let Err(err) = connection
            .execute(&*format!(r#"drop database if exists "{}";"#, self.config.name))
            .await
        {
            eprintln!("warning: failed to drop database {}: {err}", self.config.name);
        }
    }
}
