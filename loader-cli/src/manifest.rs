use std::path::Path;

use anyhow::{Context, Result};
use loader::shapefile::ShapefileJob;
use serde::Deserialize;

/// List of shapefile imports, read from YAML or JSON.
///
/// ```yaml
/// shapefiles:
///   - file_path: data/AUS_STATE.shp
///     pg_table: aus_state
///     pg_schema: raw_admin_bdys
///     delete_table: true
/// ```
#[derive(Debug, Deserialize)]
pub(crate) struct ShapefileManifest {
    pub(crate) shapefiles: Vec<ShapefileJob>,
}

pub(crate) fn load_manifest(path: &Path) -> Result<ShapefileManifest> {
    ::config::Config::builder()
        .add_source(::config::File::from(path))
        .build()
        .and_then(|manifest| manifest.try_deserialize::<ShapefileManifest>())
        .with_context(|| format!("failed to read shapefile manifest {}", path.display()))
}

/// Commands from a command file: one per line, blank lines and `#` comments skipped.
pub(crate) fn parse_command_file(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn reads_yaml_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin_bdys.yaml");
        std::fs::write(
            &path,
            "shapefiles:\n\
             \x20 - file_path: data/AUS_STATE.shp\n\
             \x20   pg_table: aus_state\n\
             \x20   pg_schema: raw_admin_bdys\n\
             \x20   delete_table: true\n\
             \x20 - file_path: data/AUS_STATE_POLYGON.dbf\n\
             \x20   pg_table: aus_state_polygon\n\
             \x20   pg_schema: raw_admin_bdys\n\
             \x20   spatial: false\n",
        )
        .unwrap();

        let manifest = load_manifest(&path).unwrap();

        assert_eq!(manifest.shapefiles.len(), 2);
        assert_eq!(
            manifest.shapefiles[0].file_path,
            PathBuf::from("data/AUS_STATE.shp")
        );
        assert!(manifest.shapefiles[0].delete_table);
        assert!(manifest.shapefiles[0].spatial);
        assert!(!manifest.shapefiles[1].delete_table);
        assert!(!manifest.shapefiles[1].spatial);
    }

    #[test]
    fn missing_manifest_names_the_file() {
        let err = load_manifest(Path::new("/nonexistent/jobs.yaml")).unwrap_err();

        assert!(err.to_string().contains("/nonexistent/jobs.yaml"));
    }

    #[test]
    fn command_file_skips_blanks_and_comments() {
        let commands = parse_command_file(
            "# restore the boundary tables\n\
             psql -f one.sql\n\
             \n\
             \x20  psql -f two.sql  \n\
             # done\n",
        );

        assert_eq!(commands, vec!["psql -f one.sql", "psql -f two.sql"]);
    }
}
