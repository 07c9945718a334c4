//! Distribution directory assembly.
//!
//! This module copies the compiled module and the manifest's declared assets
//! into `<project>/dist`. Items are placed at their declared relative path,
//! so a manifest entry of `assets/icon.png` lands at `dist/assets/icon.png`.
//! The directory is never cleared between runs.

use crate::error::{DistError, Result};
use crate::output::{missing_path_warning, write_stderr_line};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, FileTimes};
use std::io::{self, Write};
use walkdir::WalkDir;

/// Name of the distribution directory under the project root.
pub const DIST_DIR_NAME: &str = "dist";

/// Result of staging one declared item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The item was copied to this destination.
    Copied(Utf8PathBuf),
    /// The declared value was empty, so nothing was attempted.
    Skipped,
    /// The source did not exist; a warning was written and nothing copied.
    Missing,
}

/// Copies items into a project's distribution directory.
#[derive(Debug, Clone)]
pub struct DistStager {
    project_root: Utf8PathBuf,
    dist_dir: Utf8PathBuf,
}

impl DistStager {
    /// Create a stager copying from `project_root` into `dist_dir`.
    #[must_use]
    pub fn new(project_root: impl Into<Utf8PathBuf>, dist_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            dist_dir: dist_dir.into(),
        }
    }

    /// The distribution directory items are copied into.
    #[must_use]
    pub fn dist_dir(&self) -> &Utf8Path {
        &self.dist_dir
    }

    /// Ensure the distribution directory exists.
    ///
    /// Existing contents are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::StagingFailed`] if the directory cannot be created.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dist_dir).map_err(|source| DistError::StagingFailed {
            path: self.dist_dir.clone(),
            source,
        })
    }

    /// Copy a manifest-declared item into the distribution directory.
    ///
    /// Relative values resolve against the project root. A missing source
    /// produces a warning on `stderr` and is skipped. Directories are copied
    /// recursively, overwriting files already present at the destination.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::StagingFailed`] if copying fails.
    pub fn stage_item(&self, declared: &str, stderr: &mut dyn Write) -> Result<StageOutcome> {
        if declared.is_empty() {
            return Ok(StageOutcome::Skipped);
        }

        let source = self.resolve_source(declared);
        if !source.exists() {
            write_stderr_line(stderr, missing_path_warning(declared));
            log::warn!("skipping missing item {source}");
            return Ok(StageOutcome::Missing);
        }

        let dest = self.dist_dir.join(destination_relative(declared));
        log::debug!("staging {source} -> {dest}");

        let copied = if source.is_dir() {
            copy_dir_recursive(&source, &dest)
        } else {
            copy_file(&source, &dest)
        };
        copied.map_err(|err| DistError::StagingFailed {
            path: source.clone(),
            source: err,
        })?;

        Ok(StageOutcome::Copied(dest))
    }

    /// Copy the compiled module into the distribution directory.
    ///
    /// The module is placed at `entry` when one is declared, otherwise under
    /// its own filename at the top of the directory.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::StagingFailed`] if copying fails.
    pub fn stage_artifact(&self, artifact: &Utf8Path, entry: Option<&str>) -> Result<Utf8PathBuf> {
        let relative = entry
            .filter(|value| !value.is_empty())
            .or_else(|| artifact.file_name())
            .map(destination_relative)
            .unwrap_or_default();
        let dest = self.dist_dir.join(relative);
        log::debug!("staging compiled module {artifact} -> {dest}");

        copy_file(artifact, &dest).map_err(|source| DistError::StagingFailed {
            path: artifact.to_owned(),
            source,
        })?;

        Ok(dest)
    }

    fn resolve_source(&self, declared: &str) -> Utf8PathBuf {
        let path = Utf8Path::new(declared);
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.project_root.join(path)
        }
    }
}

/// Destination of a declared path relative to the distribution directory.
///
/// Leading separators are stripped and backslashes become `/`.
///
/// # Examples
///
/// ```
/// use plugin_dist::stager::destination_relative;
///
/// assert_eq!(destination_relative("/assets/icon.png"), "assets/icon.png");
/// assert_eq!(destination_relative("bin\\main.wasm"), "bin/main.wasm");
/// ```
#[must_use]
pub fn destination_relative(declared: &str) -> String {
    declared.trim_start_matches(['/', '\\']).replace('\\', "/")
}

/// Copy a file, creating parent directories and carrying over its timestamps.
fn copy_file(source: &Utf8Path, dest: &Utf8Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut reader = fs::File::open(source)?;
    let mut writer = fs::File::create(dest)?;
    io::copy(&mut reader, &mut writer)?;

    let metadata = reader.metadata()?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    writer.set_times(times)?;
    writer.set_permissions(metadata.permissions())
}

fn copy_dir_recursive(source: &Utf8Path, dest: &Utf8Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;

    for entry in WalkDir::new(source).follow_links(true).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let relative = Utf8Path::from_path(relative).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("path is not valid UTF-8: {}", entry.path().display()),
            )
        })?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            copy_file(&source.join(relative), &target)?;
        }
    }

    Ok(())
}
