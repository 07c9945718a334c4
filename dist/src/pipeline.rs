//! Dist pipeline orchestration.
//!
//! This module runs the phases of a dist run in order: load the manifest,
//! build the crate, query cargo metadata, locate the compiled module, stage
//! the distribution directory and optionally package it. Each phase must
//! succeed before the next starts.

use crate::builder::{BuildPlan, Builder};
use crate::config::DistConfig;
use crate::discovery::{ArtifactQuery, find_artifact};
use crate::error::Result;
use crate::executor::CommandExecutor;
use crate::manifest::{MANIFEST_FILE_NAME, PluginManifest};
use crate::metadata::{ProjectInfo, query_metadata};
use crate::naming::PackageName;
use crate::output::{DryRunInfo, archive_message, success_message, write_stderr_line};
use crate::packaging::{PackageOutput, package_dist};
use crate::stager::{DistStager, StageOutcome};
use camino::Utf8PathBuf;
use std::io::Write;

/// Context for a dist pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineContext<'a> {
    /// Resolved runtime settings.
    pub config: &'a DistConfig,
    /// Resolved build profile, target and cargo arguments.
    pub plan: &'a BuildPlan,
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistOutcome {
    /// The distribution directory.
    pub dist_dir: Utf8PathBuf,
    /// Where the compiled module was copied to.
    pub module_path: Utf8PathBuf,
    /// Number of items copied into the distribution directory.
    pub staged: usize,
    /// Declared items that did not exist and were skipped.
    pub missing: Vec<String>,
    /// The archive, when packaging was requested.
    pub archive: Option<PackageOutput>,
}

/// Run every phase of a dist build.
///
/// Progress goes to `stderr` unless quiet mode is set; warnings about missing
/// declared items are always written.
///
/// # Errors
///
/// Returns the first fatal error: a missing or malformed manifest, a failed
/// build or metadata query, no compiled module found, or an I/O failure while
/// staging or packaging.
pub fn run_pipeline(
    context: &PipelineContext<'_>,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<DistOutcome> {
    let config = context.config;
    let plan = context.plan;
    let manifest = PluginManifest::load(&config.project_root)?;

    progress(
        config,
        stderr,
        format!("Building {} ({} profile)...", config.project_root, plan.profile()),
    );
    Builder::new(executor, &config.cargo, &config.project_root).build(plan)?;

    let metadata = query_metadata(executor, &config.cargo, &config.project_root)?;
    let project = ProjectInfo::from_metadata(&metadata, &config.project_root);
    log::debug!(
        "target directory {}, crate {:?}",
        project.target_directory,
        project.crate_name
    );

    let query = ArtifactQuery {
        target_dir: &project.target_directory,
        profile_dir: plan.profile().output_dir_name(),
        target: plan.target(),
        entry_name: manifest.entry_file_name(),
        crate_name: project.crate_name.as_ref(),
    };
    let artifact = find_artifact(&query)?;
    log::info!("found compiled module {artifact}");

    let stager = DistStager::new(config.project_root.clone(), config.dist_dir.clone());
    progress(
        config,
        stderr,
        format!("Assembling {}...", stager.dist_dir()),
    );
    stager.prepare()?;

    let mut staging = StagingTally::default();
    staging.record(MANIFEST_FILE_NAME, stager.stage_item(MANIFEST_FILE_NAME, stderr)?);
    let module_path = stager.stage_artifact(&artifact, manifest.entry())?;
    staging.staged += 1;
    if let Some(icon) = manifest.icon() {
        staging.record(icon, stager.stage_item(icon, stderr)?);
    }
    for item in manifest.additional_files() {
        staging.record(item, stager.stage_item(item, stderr)?);
    }

    progress(config, stderr, success_message(staging.staged, &config.dist_dir));

    let archive = if config.package {
        let crate_name = project.crate_name.as_ref().map(|name| name.as_str());
        let name = PackageName::new(manifest.name.as_deref(), crate_name);
        let output = package_dist(&config.dist_dir, &config.dist_dir.join(name.filename()))?;
        progress(
            config,
            stderr,
            archive_message(&output.archive_path, output.entries.len()),
        );
        Some(output)
    } else {
        None
    };

    Ok(DistOutcome {
        dist_dir: config.dist_dir.clone(),
        module_path,
        staged: staging.staged,
        missing: staging.missing,
        archive,
    })
}

/// Describe the run without invoking cargo or touching the filesystem.
pub fn run_dry(context: &PipelineContext<'_>, stderr: &mut dyn Write) {
    let info = DryRunInfo {
        project_root: &context.config.project_root,
        dist_dir: &context.config.dist_dir,
        cargo: &context.config.cargo,
        plan: context.plan,
        package: context.config.package,
    };
    write_stderr_line(stderr, info.display_text());
}

#[derive(Debug, Default)]
struct StagingTally {
    staged: usize,
    missing: Vec<String>,
}

impl StagingTally {
    fn record(&mut self, declared: &str, outcome: StageOutcome) {
        match outcome {
            StageOutcome::Copied(_) => self.staged += 1,
            StageOutcome::Missing => self.missing.push(declared.to_owned()),
            StageOutcome::Skipped => {}
        }
    }
}

fn progress(config: &DistConfig, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !config.quiet {
        write_stderr_line(stderr, message);
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
