use std::future::Future;

use tracing::debug;

use crate::error::LoaderResult;
use crate::sql::SplitTarget;
use crate::workers::JobOutcome;

/// Something that can run loader SQL.
///
/// Implementations are cloned into every worker task, so cloning must be cheap and clones must
/// share the underlying connections.
pub trait SqlExecutor: Clone + Send + Sync + 'static {
    /// Runs a script of one or more statements in autocommit mode.
    fn execute(&self, sql: &str) -> impl Future<Output = LoaderResult<()>> + Send;

    /// Returns the smallest and largest key of the split target, or `None` when it has no rows.
    fn key_range(
        &self,
        target: &SplitTarget,
    ) -> impl Future<Output = LoaderResult<Option<(i64, i64)>>> + Send;
}

/// Runs one SQL job and turns its result into a [`JobOutcome`].
pub async fn run_sql<E>(executor: &E, sql: &str) -> JobOutcome
where
    E: SqlExecutor,
{
    match executor.execute(sql).await {
        Ok(()) => {
            debug!(bytes = sql.len(), "sql job succeeded");
            JobOutcome::Success
        }
        Err(err) => JobOutcome::failed(format!("SQL FAILED! : {sql} : {err}")),
    }
}
