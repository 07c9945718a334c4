//! Subprocess execution for cargo invocations.
//!
//! Every external command the pipeline runs goes through [`CommandExecutor`],
//! so tests can script cargo's behaviour without spawning processes.

use crate::error::{DistError, Result};
use camino::Utf8Path;
use std::process::{Command, ExitStatus, Output, Stdio};

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs a command with inherited stdio and returns its exit status.
    ///
    /// The child's output streams straight to the user's terminal.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or waiting for the
    /// command.
    fn status(&self, cmd: &str, args: &[String], cwd: &Utf8Path) -> Result<ExitStatus>;

    /// Runs a command and returns its captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use camino::Utf8Path;
    /// use plugin_dist::executor::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.output("cargo", &["--version".to_owned()], Utf8Path::new("."))?;
    /// assert!(output.status.success());
    /// # Ok::<(), plugin_dist::error::DistError>(())
    /// ```
    fn output(&self, cmd: &str, args: &[String], cwd: &Utf8Path) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn status(&self, cmd: &str, args: &[String], cwd: &Utf8Path) -> Result<ExitStatus> {
        Command::new(cmd)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(DistError::from)
    }

    fn output(&self, cmd: &str, args: &[String], cwd: &Utf8Path) -> Result<Output> {
        Command::new(cmd)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(DistError::from)
    }
}

/// Exit code of a finished process, treating signal termination as failure.
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(crate::error::GENERIC_FAILURE_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::exit_status;
    use rstest::rstest;

    #[rstest]
    #[case::success(0)]
    #[case::cargo_error(101)]
    #[case::usage(2)]
    fn exit_code_reports_process_code(#[case] code: i32) {
        assert_eq!(exit_code(exit_status(code)), code);
    }

    #[cfg(unix)]
    #[test]
    fn signal_termination_maps_to_generic_failure() {
        use std::os::unix::process::ExitStatusExt;

        // Raw wait status for a process killed by SIGKILL.
        let status = ExitStatus::from_raw(9);
        assert_eq!(exit_code(status), crate::error::GENERIC_FAILURE_CODE);
    }
}
