//! Helpers for testing code built on the loader.
//!
//! [`executor::MemoryExecutor`] stands in for the database in unit tests. [`database`] creates
//! throwaway Postgres databases for the integration suite, configured through the
//! `TESTS_DATABASE_HOST`, `TESTS_DATABASE_PORT`, `TESTS_DATABASE_USERNAME` and optional
//! `TESTS_DATABASE_PASSWORD` environment variables.

pub mod database;
pub mod executor;
