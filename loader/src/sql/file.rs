use std::path::Path;

use crate::error::{ErrorKind, LoaderResult};
use crate::loader_error;
use crate::sql::SchemaMap;

/// Reads `sql_dir/file_name` and applies the schema substitutions to it.
pub async fn open_sql_file(
    sql_dir: &Path,
    file_name: impl AsRef<Path>,
    schema_map: &SchemaMap,
) -> LoaderResult<String> {
    let path = sql_dir.join(file_name);

    let sql = tokio::fs::read_to_string(&path).await.map_err(|err| {
        loader_error!(
            ErrorKind::IoError,
            "Failed to read SQL file",
            path.display(),
            source: err
        )
    })?;

    Ok(schema_map.prep_sql(&sql))
}
