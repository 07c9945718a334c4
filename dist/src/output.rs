//! Output formatting for the dist CLI.
//!
//! Progress lines, warnings, the end-of-run summary and the dry-run report
//! are all written to stderr through these helpers.

use crate::builder::BuildPlan;
use camino::Utf8Path;
use std::io::Write;

/// Write one line to `stderr`.
///
/// Failures to write are ignored; there is nowhere left to report them.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Format the warning emitted for a declared path that does not exist.
#[must_use]
pub fn missing_path_warning(declared: &str) -> String {
    format!("warning: path not found: {declared}")
}

/// Format a success message after the distribution has been assembled.
#[must_use]
pub fn success_message(staged: usize, dist_dir: &Utf8Path) -> String {
    let plural = if staged == 1 { "item" } else { "items" };
    format!("Staged {staged} {plural} into {dist_dir}")
}

/// Format the message reporting a written archive.
#[must_use]
pub fn archive_message(archive_path: &Utf8Path, entries: usize) -> String {
    let plural = if entries == 1 { "file" } else { "files" };
    format!("Packaged {entries} {plural} into {archive_path}")
}

/// Configuration information for dry-run output.
///
/// # Example
///
/// ```
/// use camino::Utf8PathBuf;
/// use plugin_dist::builder::BuildPlan;
/// use plugin_dist::output::DryRunInfo;
///
/// let root = Utf8PathBuf::from("/home/user/my-plugin");
/// let dist = root.join("dist");
/// let plan = BuildPlan::new(true, None, Some("wasm32-wasip1"), &[]);
///
/// let info = DryRunInfo {
///     project_root: &root,
///     dist_dir: &dist,
///     cargo: "cargo",
///     plan: &plan,
///     package: true,
/// };
///
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("cargo build --release --target wasm32-wasip1"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Project root containing `Cargo.toml` and `manifest.json`.
    pub project_root: &'a Utf8Path,
    /// Directory the distribution would be assembled in.
    pub dist_dir: &'a Utf8Path,
    /// Cargo program that would be invoked.
    pub cargo: &'a str,
    /// The resolved build.
    pub plan: &'a BuildPlan,
    /// Whether an archive would be written.
    pub package: bool,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut command = vec![self.cargo.to_owned()];
        command.extend(self.plan.build_command_args());

        let mut lines = vec![
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Project root: {}", self.project_root),
            format!("Profile: {}", self.plan.profile()),
            format!("Build command: {}", command.join(" ")),
            format!("Dist directory: {}", self.dist_dir),
            format!("Package archive: {}", self.package),
        ];

        if let Some(target) = self.plan.target() {
            lines.insert(4, format!("Target: {target}"));
        }

        lines.join("\n")
    }
}
