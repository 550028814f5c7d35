use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{ErrorKind, LoaderError, LoaderResult};
use crate::loader_error;
use crate::postgres::SqlExecutor;
use crate::sql::SplitTarget;

#[derive(Debug, Default)]
struct Inner {
    executed: Vec<String>,
    failures: Vec<(String, LoaderError)>,
    key_ranges: HashMap<String, Option<(i64, i64)>>,
}

/// In-memory [`SqlExecutor`] that records statements instead of running them.
///
/// Statements containing a registered pattern fail with the registered error. Key ranges are
/// answered from values set with [`MemoryExecutor::set_key_range`].
#[derive(Debug, Clone, Default)]
pub struct MemoryExecutor {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every statement passed to [`SqlExecutor::execute`], failed ones included, in call order.
    pub async fn executed(&self) -> Vec<String> {
        self.inner.lock().await.executed.clone()
    }

    pub async fn fail_when_containing(&self, pattern: impl Into<String>, error: LoaderError) {
        self.inner
            .lock()
            .await
            .failures
            .push((pattern.into(), error));
    }

    pub async fn set_key_range(&self, target: &SplitTarget, range: Option<(i64, i64)>) {
        self.inner
            .lock()
            .await
            .key_ranges
            .insert(target.qualified_table(), range);
    }
}

impl SqlExecutor for MemoryExecutor {
    async fn execute(&self, sql: &str) -> LoaderResult<()> {
        let mut inner = self.inner.lock().await;
        inner.executed.push(sql.to_string());

        let failure = inner
            .failures
            .iter()
            .find(|(pattern, _)| sql.contains(pattern.as_str()))
            .map(|(_, error)| error.clone());

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn key_range(&self, target: &SplitTarget) -> LoaderResult<Option<(i64, i64)>> {
        let table = target.qualified_table();

        match self.inner.lock().await.key_ranges.get(&table) {
            Some(range) => Ok(*range),
            None => Err(loader_error!(
                ErrorKind::DatabaseQueryFailed,
                "Relation does not exist",
                table
            )),
        }
    }
}
