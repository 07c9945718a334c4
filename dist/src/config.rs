//! Runtime configuration resolved from the command line and environment.

use crate::cli::Cli;
use crate::error::{DistError, Result};
use crate::stager::DIST_DIR_NAME;
use camino::{Utf8Path, Utf8PathBuf};
use std::env;

/// Environment variable naming the cargo program, as set by cargo itself
/// when it runs subcommands.
pub const CARGO_ENV: &str = "CARGO";

/// Cargo program used when [`CARGO_ENV`] is unset.
const DEFAULT_CARGO: &str = "cargo";

/// Settings for one dist run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistConfig {
    /// Project root containing `Cargo.toml` and `manifest.json`.
    pub project_root: Utf8PathBuf,
    /// Directory the distribution is assembled in.
    pub dist_dir: Utf8PathBuf,
    /// Cargo program to invoke.
    pub cargo: String,
    /// Whether to compress the distribution into an archive.
    pub package: bool,
    /// Whether progress output is suppressed.
    pub quiet: bool,
}

impl DistConfig {
    /// Resolve configuration from parsed arguments.
    ///
    /// The project root is `--project-dir` when given, otherwise the current
    /// directory. The cargo program comes from `CARGO`, defaulting to `cargo`.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::Io`] if the current directory cannot be read, or
    /// [`DistError::NonUtf8Path`] if it is not valid UTF-8.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_root = match &cli.project_dir {
            Some(dir) => dir.clone(),
            None => current_dir()?,
        };
        Ok(Self::new(&project_root, cargo_program(), cli))
    }

    /// Build configuration for an explicit project root and cargo program.
    #[must_use]
    pub fn new(project_root: &Utf8Path, cargo: String, cli: &Cli) -> Self {
        let project_root = project_root
            .canonicalize_utf8()
            .unwrap_or_else(|_| project_root.to_owned());
        let dist_dir = project_root.join(DIST_DIR_NAME);

        Self {
            project_root,
            dist_dir,
            cargo,
            package: cli.package,
            quiet: cli.quiet,
        }
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = env::current_dir()?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|path| DistError::NonUtf8Path {
        path: path.display().to_string(),
    })
}

fn cargo_program() -> String {
    env::var(CARGO_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CARGO.to_owned())
}
