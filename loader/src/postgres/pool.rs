use loader_config::shared::{IntoConnectOptions, LOADER_SESSION_OPTIONS, PgConnectionConfig};
use pg_escape::quote_identifier;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor, PgPool};
use tracing::{debug, info};

use crate::error::LoaderResult;
use crate::postgres::SqlExecutor;
use crate::sql::SplitTarget;

/// Statement putting `schema` first on the search path of a session.
fn search_path_sql(schema: &str) -> String {
    format!(
        "SET search_path = {}, public, pg_catalog",
        quote_identifier(schema)
    )
}

/// Pool settings shared by eager and lazy pools.
///
/// With a `search_path_schema`, every new connection gets that schema first on its search path
/// before it is handed out. The raw address tables are referenced unqualified by key creation
/// scripts, so they need it.
fn pool_options(max_connections: u32, search_path_schema: Option<&str>) -> PgPoolOptions {
    let options = PgPoolOptions::new().max_connections(max_connections.max(1));

    let Some(schema) = search_path_schema else {
        return options;
    };

    let set_search_path = search_path_sql(schema);
    options.after_connect(move |connection, _meta| {
        let set_search_path = set_search_path.clone();
        Box::pin(async move {
            connection.execute(set_search_path.as_str()).await?;
            Ok(())
        })
    })
}

/// Opens a connection pool to the target database with the loader session settings.
pub async fn connect(
    config: &PgConnectionConfig,
    max_connections: u32,
    search_path_schema: Option<&str>,
) -> LoaderResult<PgPool> {
    let options: PgConnectOptions = config.with_db(Some(&LOADER_SESSION_OPTIONS));

    let pool = pool_options(max_connections, search_path_schema)
        .connect_with(options)
        .await?;

    info!(
        host = %config.host,
        database = %config.name,
        max_connections,
        search_path_schema,
        "connected to postgres"
    );

    Ok(pool)
}

/// Creates a pool that only connects when a statement first needs a connection.
pub fn connect_lazy(
    config: &PgConnectionConfig,
    max_connections: u32,
    search_path_schema: Option<&str>,
) -> PgPool {
    let options: PgConnectOptions = config.with_db(Some(&LOADER_SESSION_OPTIONS));

    pool_options(max_connections, search_path_schema).connect_lazy_with(options)
}

/// [`SqlExecutor`] backed by a sqlx connection pool.
///
/// Every execution holds a pooled connection for its whole duration, so the pool size bounds how
/// many statements run at once.
#[derive(Debug, Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl SqlExecutor for PgExecutor {
    async fn execute(&self, sql: &str) -> LoaderResult<()> {
        let result = sqlx::raw_sql(sql).execute(&self.pool).await?;
        debug!(rows_affected = result.rows_affected(), "executed sql");

        Ok(())
    }

    async fn key_range(&self, target: &SplitTarget) -> LoaderResult<Option<(i64, i64)>> {
        let sql = target.min_max_sql();

        let (min, max): (Option<i64>, Option<i64>) =
            sqlx::query_as(&sql).fetch_one(&self.pool).await?;

        Ok(min.zip(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_path_quotes_only_when_needed() {
        assert_eq!(
            search_path_sql("raw_gnaf_202411"),
            "SET search_path = raw_gnaf_202411, public, pg_catalog"
        );
        assert_eq!(
            search_path_sql("Raw GNAF"),
            r#"SET search_path = "Raw GNAF", public, pg_catalog"#
        );
    }

    #[tokio::test]
    async fn lazy_pool_does_not_connect_up_front() {
        let config = PgConnectionConfig {
            host: "localhost".to_string(),
            port: 5432,
            name: "geo".to_string(),
            username: "loader".to_string(),
            password: None,
            tls: loader_config::shared::TlsConfig::disabled(),
        };

        let pool = connect_lazy(&config, 4, Some("raw_gnaf_202411"));

        assert_eq!(pool.size(), 0);
        assert_eq!(pool.options().get_max_connections(), 4);
    }
}
