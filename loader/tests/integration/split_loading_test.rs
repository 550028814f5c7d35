use loader::Loader;
use loader::postgres::{PgExecutor, SqlExecutor};
use loader::sql::SplitTarget;
use loader::test_utils::database::TestDatabase;
use loader_config::shared::{LoaderConfig, SchemaConfig, ShapefileConfig};

fn loader_config(database: &TestDatabase, max_processes: u16) -> LoaderConfig {
    LoaderConfig {
        max_processes,
        sql_dir: "sql".into(),
        log_dir: None,
        schemas: SchemaConfig::default(),
        shapefile: ShapefileConfig::default(),
        pg_connection: database.config.clone(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn split_update_touches_every_row_once() {
    let database = TestDatabase::new().await;
    let executor = PgExecutor::new(database.pool.clone());
    executor
        .execute(
            "CREATE SCHEMA gnaf; \
             CREATE TABLE gnaf.address (gid serial PRIMARY KEY, hits integer NOT NULL DEFAULT 0); \
             INSERT INTO gnaf.address (hits) SELECT 0 FROM generate_series(1, 1000);",
        )
        .await
        .unwrap();

    let loader = Loader::new(&loader_config(&database, 4), executor);
    let target = SplitTarget::new("gnaf", "address", "a", "gid");
    let statements = loader
        .split_sql_into_list("UPDATE gnaf.address AS a SET hits = a.hits + 1;", &target)
        .await
        .unwrap();
    assert_eq!(statements.len(), 4);

    let report = loader.run_sql_list(statements).await;
    assert!(report.is_success());
    assert_eq!(report.succeeded, 4);

    let (min, max): (i32, i32) = sqlx::query_as("SELECT min(hits), max(hits) FROM gnaf.address")
        .fetch_one(&database.pool)
        .await
        .unwrap();
    assert_eq!((min, max), (1, 1));

    database.drop_database().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_statements_do_not_stop_the_batch() {
    let database = TestDatabase::new().await;
    let executor = PgExecutor::new(database.pool.clone());
    let loader = Loader::new(&loader_config(&database, 2), executor);

    let report = loader
        .run_sql_list(vec![
            "CREATE TABLE public.one (id integer);".to_string(),
            "SELECT * FROM public.missing;".to_string(),
            "CREATE TABLE public.two (id integer);".to_string(),
        ])
        .await;

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].starts_with("SQL FAILED! : SELECT * FROM public.missing; : "));

    database.drop_database().await;
}
