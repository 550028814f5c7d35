use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, LoaderResult};
use crate::loader_error;

const SHAPEFILE_EXTENSION: &str = "shp";

/// One shapefile to load into one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapefileJob {
    pub file_path: PathBuf,
    pub pg_table: String,
    pub pg_schema: String,
    /// Replace the table and build a spatial index, instead of appending to it.
    #[serde(default)]
    pub delete_table: bool,
    /// Load geometries. When false only the attribute table (DBF) is loaded.
    #[serde(default = "default_spatial")]
    pub spatial: bool,
}

fn default_spatial() -> bool {
    true
}

impl ShapefileJob {
    /// File name of the shapefile, used to name debug output.
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }
}

/// Builds a job for every `.shp` file below `dir`, sorted by path.
///
/// Each file loads into a table named after its lower-cased file stem.
pub fn discover_shapefiles(
    dir: &Path,
    pg_schema: &str,
    delete_table: bool,
    spatial: bool,
) -> LoaderResult<Vec<ShapefileJob>> {
    let mut files = Vec::new();
    collect_shapefiles(dir, &mut files)?;
    files.sort();

    let jobs = files
        .into_iter()
        .filter_map(|file_path| {
            let stem = file_path.file_stem()?.to_string_lossy().to_lowercase();
            Some(ShapefileJob {
                pg_table: stem,
                pg_schema: pg_schema.to_string(),
                delete_table,
                spatial,
                file_path,
            })
        })
        .collect();

    Ok(jobs)
}

fn collect_shapefiles(dir: &Path, files: &mut Vec<PathBuf>) -> LoaderResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|err| {
        loader_error!(
            ErrorKind::IoError,
            "Failed to read shapefile directory",
            dir.display(),
            source: err
        )
    })?;

    for entry in entries {
        let path = entry?.path();

        if path.is_dir() {
            collect_shapefiles(&path, files)?;
        } else if path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case(SHAPEFILE_EXTENSION))
        {
            files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_shapefiles_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("VIC");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("NSW_LOCALITY_POLYGON_shp.shp"), b"").unwrap();
        std::fs::write(dir.path().join("NSW_LOCALITY_POLYGON_shp.dbf"), b"").unwrap();
        std::fs::write(nested.join("VIC_LOCALITY_POLYGON_shp.SHP"), b"").unwrap();

        let jobs = discover_shapefiles(dir.path(), "raw_admin_bdys", true, true).unwrap();

        let tables: Vec<_> = jobs.iter().map(|job| job.pg_table.as_str()).collect();
        assert_eq!(
            tables,
            vec!["nsw_locality_polygon_shp", "vic_locality_polygon_shp"]
        );
        assert!(jobs.iter().all(|job| job.pg_schema == "raw_admin_bdys"));
        assert!(jobs.iter().all(|job| job.delete_table && job.spatial));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = discover_shapefiles(&dir.path().join("missing"), "s", true, true).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::IoError);
    }

    #[test]
    fn manifest_defaults_to_spatial_append() {
        let job: ShapefileJob = serde_json::from_str(
            r#"{"file_path": "/data/aus_state.shp", "pg_table": "aus_state", "pg_schema": "raw_admin_bdys"}"#,
        )
        .unwrap();

        assert!(job.spatial);
        assert!(!job.delete_table);
        assert_eq!(job.file_name(), "aus_state.shp");
    }
}
