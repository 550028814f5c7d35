use std::path::{Path, PathBuf};
use std::sync::Arc;

use loader_config::shared::LoaderConfig;
use tracing::info;

use crate::command::run_command_line;
use crate::error::LoaderResult;
use crate::postgres::{SqlExecutor, run_sql};
use crate::shapefile::{ShapefileConverter, ShapefileJob, Shp2Pgsql, import_shapefile};
use crate::sql::{self, SchemaMap, SplitTarget};
use crate::workers::{JobReport, WorkerPool};

/// Entry point for running load steps against one database.
///
/// Every `run_*`/`load_*` method spreads its jobs over a [`WorkerPool`] sized from
/// `max_processes`, waits for all of them, logs the failures and returns the [`JobReport`].
#[derive(Debug, Clone)]
pub struct Loader<E> {
    executor: E,
    schema_map: SchemaMap,
    sql_dir: PathBuf,
    pool: WorkerPool,
    shp2pgsql: Shp2Pgsql,
    debug_dir: Arc<PathBuf>,
}

impl<E> Loader<E>
where
    E: SqlExecutor,
{
    pub fn new(config: &LoaderConfig, executor: E) -> Self {
        Self {
            executor,
            schema_map: SchemaMap::new(&config.schemas, config.pg_connection.username.clone()),
            sql_dir: config.sql_dir.clone(),
            pool: WorkerPool::new(config.max_processes as usize),
            shp2pgsql: Shp2Pgsql::new(
                config.shapefile.shp2pgsql_path.clone(),
                config.shapefile.srid,
            ),
            debug_dir: Arc::new(config.shapefile.debug_dir.clone()),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn schema_map(&self) -> &SchemaMap {
        &self.schema_map
    }

    pub fn max_processes(&self) -> usize {
        self.pool.max_workers()
    }

    pub fn prep_sql(&self, sql: &str) -> String {
        self.schema_map.prep_sql(sql)
    }

    pub fn prep_sql_list<I, S>(&self, sql_list: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.schema_map.prep_sql_list(sql_list)
    }

    /// Reads a script from the configured SQL directory, with schema names substituted.
    pub async fn open_sql_file(&self, file_name: impl AsRef<Path>) -> LoaderResult<String> {
        sql::open_sql_file(&self.sql_dir, file_name, &self.schema_map).await
    }

    /// Splits `sql` into one statement per worker over the key range of `target`.
    pub async fn split_sql_into_list(
        &self,
        sql: &str,
        target: &SplitTarget,
    ) -> LoaderResult<Vec<String>> {
        sql::split_sql_into_list(&self.executor, sql, target, self.pool.max_workers()).await
    }

    /// Runs every statement as its own job.
    pub async fn run_sql_list(&self, sql_list: Vec<String>) -> JobReport {
        info!(
            jobs = sql_list.len(),
            max_processes = self.pool.max_workers(),
            "running sql jobs"
        );

        let executor = self.executor.clone();
        let results = self
            .pool
            .run(sql_list, move |sql: String| {
                let executor = executor.clone();
                async move { run_sql(&executor, &sql).await }
            })
            .await;

        let report = JobReport::from_results(results);
        report.log();

        report
    }

    /// Runs every shell command as its own job.
    pub async fn run_command_list(&self, commands: Vec<String>) -> JobReport {
        info!(
            jobs = commands.len(),
            max_processes = self.pool.max_workers(),
            "running command jobs"
        );

        let results = self
            .pool
            .run(commands, |cmd: String| async move {
                run_command_line(&cmd).await
            })
            .await;

        let report = JobReport::from_results(results);
        report.log();

        report
    }

    /// Imports shapefiles with the configured `shp2pgsql`.
    pub async fn load_shapefiles(&self, jobs: Vec<ShapefileJob>) -> JobReport {
        self.load_shapefiles_with(self.shp2pgsql.clone(), jobs).await
    }

    pub async fn load_shapefiles_with<C>(&self, converter: C, jobs: Vec<ShapefileJob>) -> JobReport
    where
        C: ShapefileConverter,
    {
        info!(
            jobs = jobs.len(),
            max_processes = self.pool.max_workers(),
            "loading shapefiles"
        );

        let executor = self.executor.clone();
        let debug_dir = self.debug_dir.clone();
        let results = self
            .pool
            .run(jobs, move |job: ShapefileJob| {
                let executor = executor.clone();
                let converter = converter.clone();
                let debug_dir = debug_dir.clone();
                async move { import_shapefile(&executor, &converter, &job, &debug_dir).await }
            })
            .await;

        let report = JobReport::from_results(results);
        report.log();

        report
    }
}
