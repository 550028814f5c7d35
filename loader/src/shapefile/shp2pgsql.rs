use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{ErrorKind, LoaderResult};
use crate::loader_error;
use crate::shapefile::ShapefileJob;

/// Turns a shapefile into the SQL that recreates it in Postgres.
pub trait ShapefileConverter: Clone + Send + Sync + 'static {
    fn convert(&self, job: &ShapefileJob) -> impl Future<Output = LoaderResult<String>> + Send;
}

/// Converter running the PostGIS `shp2pgsql` tool.
#[derive(Debug, Clone)]
pub struct Shp2Pgsql {
    program: PathBuf,
    srid: u32,
}

impl Shp2Pgsql {
    pub fn new(program: impl Into<PathBuf>, srid: u32) -> Self {
        Self {
            program: program.into(),
            srid,
        }
    }

    /// Command line arguments for `job`.
    ///
    /// Replacing loads drop and recreate the table with a spatial index (`-d -I`), otherwise rows
    /// are appended (`-a`). Spatial loads tag geometries with the SRID, non-spatial loads only
    /// read the attribute table (`-G -n`). Integer columns stay 32 bit (`-i`).
    pub fn args(&self, job: &ShapefileJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(9);

        if job.delete_table {
            args.push(OsString::from("-d"));
            args.push(OsString::from("-I"));
        } else {
            args.push(OsString::from("-a"));
        }

        if job.spatial {
            args.push(OsString::from("-s"));
            args.push(OsString::from(self.srid.to_string()));
        } else {
            args.push(OsString::from("-G"));
            args.push(OsString::from("-n"));
        }

        args.push(OsString::from("-i"));
        args.push(job.file_path.clone().into_os_string());
        args.push(OsString::from(format!("{}.{}", job.pg_schema, job.pg_table)));

        args
    }
}

impl ShapefileConverter for Shp2Pgsql {
    async fn convert(&self, job: &ShapefileJob) -> LoaderResult<String> {
        let args = self.args(job);
        debug!(program = %self.program.display(), ?args, "running shp2pgsql");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                loader_error!(
                    ErrorKind::CommandFailed,
                    "Failed to start shp2pgsql",
                    self.program.display(),
                    source: err
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(loader_error!(
                ErrorKind::CommandFailed,
                "shp2pgsql exited unsuccessfully",
                format!("{}: {}", output.status, stderr.trim())
            ));
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}
