//! Parallel loading of address and boundary data into PostgreSQL.
//!
//! SQL scripts are rewritten for the configured schemas ([`sql`]), optionally split into key range
//! partitions, and run concurrently on a bounded [`workers::WorkerPool`]. Shell commands and
//! `shp2pgsql` shapefile imports run through the same pool. Every job reports a
//! [`workers::JobOutcome`]; [`Loader`] ties it together and logs a [`workers::JobReport`] per
//! batch.

pub mod command;
pub mod error;
mod loader;
mod macros;
pub mod postgres;
pub mod shapefile;
pub mod sql;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod workers;

pub use loader::Loader;
