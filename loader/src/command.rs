//! Shell command jobs.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::workers::JobOutcome;

#[cfg(not(windows))]
const SHELL: (&str, &str) = ("sh", "-c");
#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");

/// Runs `cmd` through the platform shell with all output discarded.
///
/// The command fails when it cannot be started or exits unsuccessfully.
pub async fn run_command_line(cmd: &str) -> JobOutcome {
    let (shell, flag) = SHELL;

    run_in_shell(shell, flag, cmd).await
}

async fn run_in_shell(shell: &str, flag: &str, cmd: &str) -> JobOutcome {
    let status = Command::new(shell)
        .arg(flag)
        .arg(cmd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await;

    match status {
        Ok(status) if status.success() => {
            debug!(command = cmd, "command succeeded");
            JobOutcome::Success
        }
        Ok(status) => JobOutcome::failed(format!("COMMAND FAILED! : {cmd} : {status}")),
        Err(err) => JobOutcome::failed(format!("COMMAND FAILED! : {cmd} : {err}")),
    }
}
