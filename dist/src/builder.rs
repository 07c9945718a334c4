//! Cargo build orchestration for the plugin crate.
//!
//! This module turns the command-line profile and target selection into a
//! `cargo build` argument list and runs it with the user's terminal attached.

use crate::error::{DistError, Result};
use crate::executor::{CommandExecutor, exit_code};
use camino::Utf8Path;
use std::fmt;

/// The Cargo build profile selected for a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuildProfile {
    /// Cargo's default `dev` profile, built into `debug/`.
    #[default]
    Debug,
    /// The `release` profile.
    Release,
    /// A named profile passed through with `--profile`.
    Custom(String),
}

impl BuildProfile {
    /// Resolve the profile from the `--release` and `--profile` flags.
    ///
    /// An explicit profile name wins over `--release`.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_dist::builder::BuildProfile;
    ///
    /// assert_eq!(BuildProfile::resolve(false, None), BuildProfile::Debug);
    /// assert_eq!(BuildProfile::resolve(true, None), BuildProfile::Release);
    /// assert_eq!(
    ///     BuildProfile::resolve(true, Some("dist")),
    ///     BuildProfile::Custom("dist".to_owned())
    /// );
    /// ```
    #[must_use]
    pub fn resolve(release: bool, profile: Option<&str>) -> Self {
        match profile {
            Some(name) => Self::Custom(name.to_owned()),
            None if release => Self::Release,
            None => Self::Debug,
        }
    }

    /// The profile label as the user selected it.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Name of the directory cargo writes this profile's output into.
    ///
    /// Cargo keeps its built-in `dev` and `test` profiles in `debug/` and
    /// `bench` in `release/`; every other profile uses its own name.
    #[must_use]
    pub fn output_dir_name(&self) -> &str {
        match self.label() {
            "dev" | "test" => "debug",
            "bench" => "release",
            other => other,
        }
    }

    /// Cargo flags that select this profile.
    #[must_use]
    pub fn cargo_flags(&self) -> Vec<String> {
        match self {
            Self::Debug => Vec::new(),
            Self::Release => vec!["--release".to_owned()],
            Self::Custom(name) => vec!["--profile".to_owned(), name.clone()],
        }
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The resolved build: profile, optional target triple, and cargo arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    profile: BuildProfile,
    target: Option<String>,
    cargo_args: Vec<String>,
}

impl BuildPlan {
    /// Resolve a build plan from the profile flags, target and pass-through
    /// arguments.
    ///
    /// The argument list is assembled as profile flags, then `--target`, then
    /// the pass-through tokens in the order given.
    #[must_use]
    pub fn new(
        release: bool,
        profile: Option<&str>,
        target: Option<&str>,
        passthrough: &[String],
    ) -> Self {
        let profile = BuildProfile::resolve(release, profile);
        let mut cargo_args = profile.cargo_flags();
        if let Some(triple) = target {
            cargo_args.extend(["--target".to_owned(), triple.to_owned()]);
        }
        cargo_args.extend(passthrough.iter().cloned());

        Self {
            profile,
            target: target.map(str::to_owned),
            cargo_args,
        }
    }

    /// The selected build profile.
    #[must_use]
    pub const fn profile(&self) -> &BuildProfile {
        &self.profile
    }

    /// The target triple override, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Arguments passed to `cargo build`, excluding the subcommand itself.
    #[must_use]
    pub fn cargo_args(&self) -> &[String] {
        &self.cargo_args
    }

    /// The full argument list for the build invocation.
    #[must_use]
    pub fn build_command_args(&self) -> Vec<String> {
        std::iter::once("build".to_owned())
            .chain(self.cargo_args.iter().cloned())
            .collect()
    }
}

/// Runs `cargo build` for a project.
pub struct Builder<'a> {
    executor: &'a dyn CommandExecutor,
    cargo: &'a str,
    project_root: &'a Utf8Path,
}

impl<'a> Builder<'a> {
    /// Create a builder that invokes `cargo` inside `project_root`.
    #[must_use]
    pub fn new(
        executor: &'a dyn CommandExecutor,
        cargo: &'a str,
        project_root: &'a Utf8Path,
    ) -> Self {
        Self {
            executor,
            cargo,
            project_root,
        }
    }

    /// Build the project according to `plan`.
    ///
    /// Cargo's output streams directly to the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::BuildFailed`] carrying cargo's exit code when the
    /// build fails, or [`DistError::Io`] if cargo cannot be spawned.
    pub fn build(&self, plan: &BuildPlan) -> Result<()> {
        let args = plan.build_command_args();
        log::debug!("running {} {}", self.cargo, args.join(" "));

        let status = self.executor.status(self.cargo, &args, self.project_root)?;
        if !status.success() {
            return Err(DistError::BuildFailed {
                code: exit_code(status),
            });
        }

        Ok(())
    }
}
