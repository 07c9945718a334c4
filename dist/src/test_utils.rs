//! Shared test utilities for the dist crate.

use crate::error::{DistError, Result};
use crate::executor::CommandExecutor;
use camino::Utf8Path;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    stdout_output(String::new())
}

/// Creates a successful command `Output` with the given stdout.
#[must_use]
pub fn stdout_output(stdout: impl Into<String>) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.into().into_bytes(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given exit code and stderr.
#[must_use]
pub fn failure_output(code: i32, stderr: &str) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Renders one package entry of a `cargo metadata` report.
///
/// Returns the package id alongside the JSON so callers can list it as a
/// workspace member.
#[must_use]
pub fn package_json(package_name: &str, package_root: &Utf8Path) -> (String, serde_json::Value) {
    let manifest_path = package_root.join("Cargo.toml");
    let src_path = package_root.join("src").join("lib.rs");
    let id = format!("path+file://{package_root}#{package_name}@0.1.0");
    let crate_name = package_name.replace('-', "_");
    let package = serde_json::json!({
        "name": package_name,
        "version": "0.1.0",
        "id": id.as_str(),
        "license": null,
        "license_file": null,
        "description": null,
        "source": null,
        "dependencies": [],
        "targets": [{
            "kind": ["cdylib"],
            "crate_types": ["cdylib"],
            "name": crate_name,
            "src_path": src_path.as_str(),
            "edition": "2021",
            "doc": true,
            "doctest": false,
            "test": true
        }],
        "features": {},
        "manifest_path": manifest_path.as_str(),
        "metadata": null,
        "publish": null,
        "authors": [],
        "categories": [],
        "keywords": [],
        "readme": null,
        "repository": null,
        "homepage": null,
        "documentation": null,
        "edition": "2021",
        "links": null,
        "default_run": null,
        "rust_version": null
    });
    (id, package)
}

/// Renders a `cargo metadata --format-version 1` report.
#[must_use]
pub fn metadata_report_json(
    packages: &[serde_json::Value],
    workspace_members: &[String],
    workspace_root: &Utf8Path,
    target_directory: &Utf8Path,
) -> String {
    serde_json::json!({
        "packages": packages,
        "workspace_members": workspace_members,
        "workspace_default_members": workspace_members,
        "resolve": null,
        "target_directory": target_directory.as_str(),
        "version": 1,
        "workspace_root": workspace_root.as_str(),
        "metadata": null
    })
    .to_string()
}

/// Renders a report for a single-package project rooted at `workspace_root`.
#[must_use]
pub fn metadata_json(
    package_name: &str,
    workspace_root: &Utf8Path,
    target_directory: &Utf8Path,
) -> String {
    let (id, package) = package_json(package_name, workspace_root);
    metadata_report_json(&[package], &[id], workspace_root, target_directory)
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "cargo").
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

impl ExpectedCall {
    /// Creates an expectation for `cmd` with the given arguments.
    #[must_use]
    pub fn new(cmd: &'static str, args: &[&str], result: Result<Output>) -> Self {
        Self {
            cmd,
            args: args.iter().map(|&arg| arg.to_owned()).collect(),
            result,
        }
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Replays expected command invocations in order and returns predefined
/// results, allowing the whole pipeline to run without spawning cargo.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Returns true when every expected invocation has been consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.expected.borrow().is_empty()
    }

    fn next_call(&self, cmd: &str, args: &[String]) -> Result<Output> {
        let call = self
            .expected
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| DistError::StubMismatch {
                message: format!("unexpected invocation: {cmd} {}", args.join(" ")),
            })?;

        if call.cmd != cmd || call.args.as_slice() != args {
            return Err(DistError::StubMismatch {
                message: format!(
                    "expected `{} {}`, got `{cmd} {}`",
                    call.cmd,
                    call.args.join(" "),
                    args.join(" ")
                ),
            });
        }

        call.result
    }
}

impl CommandExecutor for StubExecutor {
    fn status(&self, cmd: &str, args: &[String], _cwd: &Utf8Path) -> Result<ExitStatus> {
        self.next_call(cmd, args).map(|output| output.status)
    }

    fn output(&self, cmd: &str, args: &[String], _cwd: &Utf8Path) -> Result<Output> {
        self.next_call(cmd, args)
    }
}
