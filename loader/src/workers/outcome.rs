use std::fmt;

use tracing::{info, warn};

use crate::workers::PoolResults;

/// Pass/fail status reported by a single job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    /// Failure with a message naming the job and the reason.
    Failed(String),
}

impl JobOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        JobOutcome::Failed(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success)
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Success => f.write_str("SUCCESS"),
            JobOutcome::Failed(message) => f.write_str(message),
        }
    }
}

/// Summary of a batch of jobs run through the worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub submitted: usize,
    pub succeeded: usize,
    pub failures: Vec<String>,
    /// Jobs that ended without reporting any outcome.
    pub lost: usize,
}

impl JobReport {
    pub fn from_results(results: PoolResults<JobOutcome>) -> Self {
        let mut succeeded = 0;
        let mut failures = Vec::new();

        for outcome in results.results {
            match outcome {
                JobOutcome::Success => succeeded += 1,
                JobOutcome::Failed(message) => failures.push(message),
            }
        }

        Self {
            submitted: results.submitted,
            succeeded,
            failures,
            lost: results.lost,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.lost == 0
    }

    /// Logs lost jobs and every failure message.
    pub fn log(&self) {
        if self.lost > 0 {
            warn!(
                lost = self.lost,
                submitted = self.submitted,
                "a worker failed without reporting a result, check the record counts"
            );
        }

        for failure in &self.failures {
            warn!("{failure}");
        }

        info!(
            submitted = self.submitted,
            succeeded = self.succeeded,
            failed = self.failures.len(),
            "jobs finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug, Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn success_displays_as_success() {
        assert_eq!(JobOutcome::Success.to_string(), "SUCCESS");
        assert_eq!(JobOutcome::failed("nope").to_string(), "nope");
    }

    #[test]
    fn report_counts_outcomes() {
        let report = JobReport::from_results(PoolResults {
            submitted: 4,
            results: vec![
                JobOutcome::Success,
                JobOutcome::failed("SQL FAILED! : x : y"),
                JobOutcome::Success,
            ],
            lost: 1,
        });

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failures, vec!["SQL FAILED! : x : y".to_string()]);
        assert_eq!(report.lost, 1);
        assert!(!report.is_success());
    }

    #[test]
    fn report_without_failures_or_losses_is_success() {
        let report = JobReport::from_results(PoolResults {
            submitted: 1,
            results: vec![JobOutcome::Success],
            lost: 0,
        });

        assert!(report.is_success());
    }

    #[test]
    fn lost_jobs_are_warned_about() {
        let report = JobReport::from_results(PoolResults {
            submitted: 3,
            results: vec![
                JobOutcome::Success,
                JobOutcome::failed("COMMAND FAILED! : x : y"),
            ],
            lost: 1,
        });

        let logs = capture_logs(|| report.log());

        assert!(logs.contains("a worker failed without reporting a result"));
        assert!(logs.contains("lost=1"));
        assert!(logs.contains("COMMAND FAILED! : x : y"));
        assert!(logs.contains("jobs finished"));
    }

    #[test]
    fn complete_batch_logs_no_warning() {
        let report = JobReport::from_results(PoolResults {
            submitted: 2,
            results: vec![JobOutcome::Success, JobOutcome::Success],
            lost: 0,
        });

        let logs = capture_logs(|| report.log());

        assert!(!logs.contains("WARN"));
        assert!(logs.contains("succeeded=2"));
    }
}
