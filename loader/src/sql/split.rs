use pg_escape::quote_identifier;
use tracing::{info, warn};

use crate::bail;
use crate::error::{ErrorKind, LoaderResult};
use crate::postgres::SqlExecutor;

/// Fewest keys a partition covers when the table is too small to feed every worker.
const MIN_ROWS_PER_PARTITION: i128 = 10;

/// Table whose integer key drives the partitioning of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitTarget {
    pub schema: String,
    pub table: String,
    /// Alias the table has inside the statement being split.
    pub alias: String,
    /// Integer key column, usually `gid`.
    pub gid: String,
}

impl SplitTarget {
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        alias: impl Into<String>,
        gid: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            alias: alias.into(),
            gid: gid.into(),
        }
    }

    pub fn qualified_table(&self) -> String {
        format!(
            "{}.{}",
            quote_identifier(&self.schema),
            quote_identifier(&self.table)
        )
    }

    /// Query returning the smallest and largest key of the table as `bigint`s.
    pub fn min_max_sql(&self) -> String {
        let gid = quote_identifier(&self.gid);

        format!(
            "SELECT MIN({gid})::bigint AS min, MAX({gid})::bigint AS max FROM {}",
            self.qualified_table()
        )
    }
}

/// Half-open key interval `(start, end]`.
///
/// Bounds are wider than the `bigint` keys so ranges around the extremes of the key type stay
/// exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRange {
    pub start: i128,
    pub end: i128,
}

impl KeyRange {
    pub fn where_clause(&self, alias: &str, gid: &str) -> String {
        format!(
            " WHERE {alias}.{gid} > {} AND {alias}.{gid} <= {}",
            self.start, self.end
        )
    }
}

/// Divides the keys `min..=max` into contiguous ranges, one per worker.
///
/// Every worker gets `(max - min) / max_workers + 1` keys. When that would be fewer than
/// [`MIN_ROWS_PER_PARTITION`], ranges of that minimum size are used instead and fewer are
/// produced. The first range starts just below `min` and the last one reaches at least `max`.
pub fn partition_ranges(min: i64, max: i64, max_workers: usize) -> Vec<KeyRange> {
    let workers = max_workers.max(1) as i128;
    let diff = (i128::from(max) - i128::from(min)).max(0);

    let (rows_per_request, partitions) = if diff < MIN_ROWS_PER_PARTITION * workers {
        let partitions = diff / MIN_ROWS_PER_PARTITION + 1;
        info!(
            partitions = partitions as u64,
            "adjusted partition count due to low row count in table to split"
        );
        (MIN_ROWS_PER_PARTITION, partitions)
    } else {
        (diff / workers + 1, workers)
    };

    let mut ranges = Vec::with_capacity(partitions as usize);
    let mut start = i128::from(min) - 1;

    for _ in 0..partitions {
        let end = start + rows_per_request;
        ranges.push(KeyRange { start, end });
        start = end;
    }

    ranges
}

/// Restricts `sql` to one key range.
///
/// The filter is merged into an existing `WHERE` (every ` WHERE ` becomes
/// `{filter} AND `), otherwise placed before `GROUP BY`, else before `ORDER BY`, else before
/// each `;`, and appended as a last resort.
pub fn apply_range(sql: &str, alias: &str, gid: &str, range: KeyRange) -> String {
    let where_clause = range.where_clause(alias, gid);

    if sql.contains("WHERE ") {
        sql.replace(" WHERE ", &format!("{where_clause} AND "))
    } else if sql.contains("GROUP BY ") {
        sql.replace("GROUP BY ", &format!("{where_clause} GROUP BY "))
    } else if sql.contains("ORDER BY ") {
        sql.replace("ORDER BY ", &format!("{where_clause} ORDER BY "))
    } else if sql.contains(';') {
        sql.replace(';', &format!("{where_clause};"))
    } else {
        warn!("no ; found at the end of the SQL statement");
        format!("{sql}{where_clause}")
    }
}

/// Splits `sql` into one statement per key range of `target`.
///
/// Fails with [`ErrorKind::EmptyTable`] when the table has no keys to split on.
pub async fn split_sql_into_list<E>(
    executor: &E,
    sql: &str,
    target: &SplitTarget,
    max_workers: usize,
) -> LoaderResult<Vec<String>>
where
    E: SqlExecutor,
{
    let Some((min, max)) = executor.key_range(target).await? else {
        bail!(
            ErrorKind::EmptyTable,
            "Table to split has no rows",
            target.min_max_sql()
        );
    };

    let statements = partition_ranges(min, max, max_workers)
        .into_iter()
        .map(|range| apply_range(sql, &target.alias, &target.gid, range))
        .collect();

    Ok(statements)
}
