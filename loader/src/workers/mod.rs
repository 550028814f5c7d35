//! Fixed-size worker pool and the pass/fail bookkeeping of the jobs it runs.

mod outcome;
mod pool;

pub use outcome::{JobOutcome, JobReport};
pub use pool::{PoolResults, WorkerPool};
