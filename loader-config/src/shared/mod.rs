//! Configuration types shared by the loader binaries.

mod connection;
mod loader;

pub use connection::{
    IntoConnectOptions, LOADER_SESSION_OPTIONS, PgConnectionConfig, PgConnectionOptions, TlsConfig,
};
pub use loader::{
    DEFAULT_SRID, LoaderConfig, SchemaConfig, ShapefileConfig, ValidationError,
};
