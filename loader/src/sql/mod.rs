//! Text-level handling of the canned SQL scripts: schema substitution, reading script files,
//! and splitting a statement into primary key partitions.

mod file;
mod prep;
mod split;

pub use file::open_sql_file;
pub use prep::SchemaMap;
pub use split::{KeyRange, SplitTarget, apply_range, partition_ranges, split_sql_into_list};
