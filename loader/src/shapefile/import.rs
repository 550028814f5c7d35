use std::path::Path;

use tracing::{debug, warn};

use crate::postgres::SqlExecutor;
use crate::shapefile::{ShapefileConverter, ShapefileJob};
use crate::workers::JobOutcome;

/// Makes `shp2pgsql` output runnable as a single script.
///
/// The informational header lines are commented out, as is the `DropGeometryColumn` call that
/// fails on tables without a geometry column. `DROP TABLE` always gets `IF EXISTS`, whichever
/// form the installed PostGIS version emitted.
pub fn prepare_import_sql(sql: &str) -> String {
    sql.replace("Shapefile type: ", "-- Shapefile type: ")
        .replace("Postgis type: ", "-- Postgis type: ")
        .replace("SELECT DropGeometryColumn", "-- SELECT DropGeometryColumn")
        .replace("DROP TABLE ", "DROP TABLE IF EXISTS ")
        .replace("DROP TABLE IF EXISTS IF EXISTS ", "DROP TABLE IF EXISTS ")
}

/// Imports one shapefile: convert it to SQL, run the SQL, then cluster replaced spatial tables on
/// their geometry index.
///
/// When the SQL fails it is written to `debug_dir/error_debug_{file name}.sql` for inspection.
pub async fn import_shapefile<E, C>(
    executor: &E,
    converter: &C,
    job: &ShapefileJob,
    debug_dir: &Path,
) -> JobOutcome
where
    E: SqlExecutor,
    C: ShapefileConverter,
{
    let sql = match converter.convert(job).await {
        Ok(sql) => prepare_import_sql(&sql),
        Err(err) => {
            return JobOutcome::failed(format!(
                "Importing {} - Couldn't convert Shapefile to SQL : {err}",
                job.file_path.display()
            ));
        }
    };

    let file_name = job.file_name();

    if let Err(err) = executor.execute(&sql).await {
        let debug_path = debug_dir.join(format!("error_debug_{file_name}.sql"));
        if let Err(write_err) = tokio::fs::write(&debug_path, &sql).await {
            warn!(
                path = %debug_path.display(),
                error = %write_err,
                "failed to write shapefile debug sql"
            );
        }

        return JobOutcome::failed(format!(
            "Importing {file_name} - Couldn't run Shapefile SQL, shp2pgsql result was: {err}"
        ));
    }

    if job.delete_table && job.spatial {
        // Names are emitted as configured and left to Postgres case folding.
        let cluster_sql = format!(
            "ALTER TABLE {schema}.{table} CLUSTER ON {table}_geom_idx",
            schema = job.pg_schema,
            table = job.pg_table
        );

        if let Err(err) = executor.execute(&cluster_sql).await {
            return JobOutcome::failed(format!(
                "Importing {} - Couldn't cluster on spatial index : {err}",
                job.pg_table
            ));
        }
    }

    debug!(file = %file_name, table = %job.pg_table, "imported shapefile");

    JobOutcome::Success
}
