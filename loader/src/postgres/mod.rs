//! Execution of SQL against the target database.

mod executor;
mod pool;

pub use executor::{SqlExecutor, run_sql};
pub use pool::{PgExecutor, connect, connect_lazy};
pub use sqlx::PgPool;
