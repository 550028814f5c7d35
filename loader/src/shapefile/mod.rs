//! Shapefile ingestion: shapefiles are converted to SQL by `shp2pgsql` and the SQL is run
//! against the target database.

mod import;
mod job;
mod shp2pgsql;

pub use import::{import_shapefile, prepare_import_sql};
pub use job::{ShapefileJob, discover_shapefiles};
pub use shp2pgsql::{ShapefileConverter, Shp2Pgsql};
