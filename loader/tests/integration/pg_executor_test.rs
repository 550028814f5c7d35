use loader::error::ErrorKind;
use loader::postgres::{PgExecutor, SqlExecutor, connect};
use loader::sql::SplitTarget;
use loader::test_utils::database::TestDatabase;

#[tokio::test(flavor = "multi_thread")]
async fn executes_multi_statement_scripts() {
    let database = TestDatabase::new().await;
    let executor = PgExecutor::new(database.pool.clone());

    executor
        .execute(
            "CREATE SCHEMA gnaf; \
             CREATE TABLE gnaf.locality (gid serial PRIMARY KEY, name text); \
             INSERT INTO gnaf.locality (name) VALUES ('SYDNEY'), ('MELBOURNE');",
        )
        .await
        .unwrap();

    let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM gnaf.locality")
        .fetch_one(&database.pool)
        .await
        .unwrap();
    assert_eq!(count, 2);

    database.drop_database().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn raw_schema_is_put_on_the_search_path() {
    let database = TestDatabase::new().await;
    let setup = PgExecutor::new(database.pool.clone());
    setup
        .execute("CREATE SCHEMA raw_gnaf_test; CREATE TABLE raw_gnaf_test.state (gid integer);")
        .await
        .unwrap();

    let pool = connect(&database.config, 2, Some("raw_gnaf_test"))
        .await
        .unwrap();
    let executor = PgExecutor::new(pool.clone());
    // More statements than connections so pooled connections are reused.
    for gid in 1..=3 {
        executor
            .execute(&format!("INSERT INTO state (gid) VALUES ({gid});"))
            .await
            .unwrap();
    }
    pool.close().await;

    let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM raw_gnaf_test.state")
        .fetch_one(&database.pool)
        .await
        .unwrap();
    assert_eq!(count, 3);

    database.drop_database().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn key_range_of_empty_table_is_none() {
    let database = TestDatabase::new().await;
    let executor = PgExecutor::new(database.pool.clone());
    executor
        .execute("CREATE TABLE public.address (gid serial PRIMARY KEY);")
        .await
        .unwrap();

    let target = SplitTarget::new("public", "address", "a", "gid");
    assert_eq!(executor.key_range(&target).await.unwrap(), None);

    executor
        .execute("INSERT INTO public.address SELECT generate_series(5, 50);")
        .await
        .unwrap();
    assert_eq!(executor.key_range(&target).await.unwrap(), Some((5, 50)));

    database.drop_database().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_statement_is_a_query_error() {
    let database = TestDatabase::new().await;
    let executor = PgExecutor::new(database.pool.clone());

    let err = executor
        .execute("SELECT * FROM does_not_exist;")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DatabaseQueryFailed);

    database.drop_database().await;
}
