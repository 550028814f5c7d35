//! Typed configuration for the loader tools and the machinery to read it from disk.

mod environment;
mod load;
pub mod shared;

pub use environment::Environment;
pub use load::{Config, LoadConfigError, load_config, load_config_from};
