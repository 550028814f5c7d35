mod pg_executor_test;
mod split_loading_test;
