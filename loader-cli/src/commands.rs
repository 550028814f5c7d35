use anyhow::{Context, Result, bail};
use loader::Loader;
use loader::postgres::{PgExecutor, connect, connect_lazy};
use loader::shapefile::discover_shapefiles;
use loader::sql::{SchemaMap, SplitTarget};
use loader::workers::JobReport;
use loader_config::shared::LoaderConfig;
use tracing::info;

use crate::cli::{Command, CommandsArgs, ShapefilesArgs, SqlArgs};
use crate::manifest::{load_manifest, parse_command_file};

impl Command {
    pub(crate) async fn run(self, config: &LoaderConfig) -> Result<JobReport> {
        match self {
            Command::Sql(args) => {
                let loader = connected_loader(config).await?;
                args.run(&loader).await
            }
            Command::Commands(args) => {
                // Command jobs do not use the database.
                let pool = connect_lazy(
                    &config.pg_connection,
                    config.max_processes as u32,
                    None,
                );
                let loader = Loader::new(config, PgExecutor::new(pool));
                args.run(&loader).await
            }
            Command::Shapefiles(args) => {
                let loader = connected_loader(config).await?;
                args.run(&loader).await
            }
        }
    }
}

impl SqlArgs {
    async fn run(self, loader: &Loader<PgExecutor>) -> Result<JobReport> {
        let target = match (&self.split, &self.alias) {
            (Some(table), Some(alias)) => Some(parse_split_target(table, alias, &self.gid)?),
            _ => None,
        };

        let mut sql_list = Vec::new();
        for file in &self.files {
            let sql = loader
                .open_sql_file(file)
                .await
                .with_context(|| format!("failed to open {}", file.display()))?;

            match &target {
                Some(target) => {
                    let statements = loader
                        .split_sql_into_list(&sql, target)
                        .await
                        .with_context(|| format!("failed to split {}", file.display()))?;
                    sql_list.extend(statements);
                }
                None => sql_list.push(sql),
            }
        }

        Ok(loader.run_sql_list(sql_list).await)
    }
}

impl CommandsArgs {
    async fn run(self, loader: &Loader<PgExecutor>) -> Result<JobReport> {
        let contents = tokio::fs::read_to_string(&self.file)
            .await
            .with_context(|| format!("failed to read command file {}", self.file.display()))?;

        Ok(loader.run_command_list(parse_command_file(&contents)).await)
    }
}

impl ShapefilesArgs {
    async fn run(self, loader: &Loader<PgExecutor>) -> Result<JobReport> {
        let jobs = match (&self.manifest, &self.dir, &self.schema) {
            (Some(manifest), _, _) => load_manifest(manifest)?.shapefiles,
            (None, Some(dir), Some(schema)) => {
                discover_shapefiles(dir, schema, !self.append, !self.non_spatial)
                    .with_context(|| format!("failed to scan {}", dir.display()))?
            }
            _ => bail!("either --manifest or --dir with --schema is required"),
        };

        if jobs.is_empty() {
            info!("no shapefiles to import");
        }

        Ok(loader.load_shapefiles(jobs).await)
    }
}

async fn connected_loader(config: &LoaderConfig) -> Result<Loader<PgExecutor>> {
    let schema_map = SchemaMap::new(&config.schemas, config.pg_connection.username.clone());
    let pool = connect(
        &config.pg_connection,
        config.max_processes as u32,
        schema_map.search_path_schema(),
    )
    .await
    .context("failed to connect to postgres")?;

    Ok(Loader::new(config, PgExecutor::new(pool)))
}

/// Parses `schema.table` into a split target.
fn parse_split_target(table: &str, alias: &str, gid: &str) -> Result<SplitTarget> {
    let Some((schema, table)) = table.split_once('.') else {
        bail!("split table `{table}` must be qualified as schema.table");
    };

    if schema.is_empty() || table.is_empty() {
        bail!("split table `{schema}.{table}` must be qualified as schema.table");
    }

    Ok(SplitTarget::new(schema, table, alias, gid))
}
