//! Compiled module discovery inside cargo's output tree.
//!
//! The output tree accumulates artifacts from earlier builds, other profiles
//! and other targets. Discovery narrows it down to the module the build just
//! produced: candidate filenames are tried in priority order, matches outside
//! the active profile's directory are ignored, and the newest survivor wins.

use crate::crate_name::CrateName;
use crate::error::{DistError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::cmp::Reverse;
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

/// File extension of compiled WebAssembly modules.
pub const MODULE_EXTENSION: &str = "wasm";

/// Inputs for locating the compiled module.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactQuery<'a> {
    /// Cargo's build output directory.
    pub target_dir: &'a Utf8Path,
    /// Directory name of the active profile (for example `debug`).
    pub profile_dir: &'a str,
    /// Target triple override, if one was given.
    pub target: Option<&'a str>,
    /// Final path component of the manifest's entry, if declared.
    pub entry_name: Option<&'a str>,
    /// Normalised crate name of the root package.
    pub crate_name: Option<&'a CrateName>,
}

impl ArtifactQuery<'_> {
    /// Candidate filenames in priority order.
    #[must_use]
    pub fn candidate_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if let Some(entry) = self.entry_name {
            names.push(entry.to_owned());
        }
        if let Some(crate_name) = self.crate_name {
            names.push(crate_name.module_filename());
            names.push(crate_name.library_module_filename());
        }
        names
    }

    /// Directory to search.
    ///
    /// Uses the target triple's subdirectory when a target was given and the
    /// directory exists, otherwise the whole output tree.
    #[must_use]
    pub fn search_root(&self) -> Utf8PathBuf {
        self.target
            .map(|triple| self.target_dir.join(triple))
            .filter(|dir| dir.is_dir())
            .unwrap_or_else(|| self.target_dir.to_owned())
    }

    fn searched_description(&self) -> String {
        self.entry_name
            .map(str::to_owned)
            .or_else(|| self.crate_name.map(CrateName::to_string))
            .unwrap_or_else(|| format!("*.{MODULE_EXTENSION}"))
    }
}

/// Locate the compiled module described by `query`.
///
/// Candidates are tried in order and the first one with any match wins;
/// among its matches the most recently modified file is chosen, with ties
/// broken by the lexicographically smallest path.
///
/// # Errors
///
/// Returns [`DistError::ArtifactNotFound`] when no candidate matches.
pub fn find_artifact(query: &ArtifactQuery<'_>) -> Result<Utf8PathBuf> {
    let root = query.search_root();
    log::debug!("searching {root} for compiled module");

    for candidate in query.candidate_names() {
        let matches = collect_matches(&root, query.target_dir, query.profile_dir, &candidate);
        log::debug!("{} match(es) for {candidate}", matches.len());

        if let Some(newest) = newest(matches) {
            return Utf8PathBuf::from_path_buf(newest).map_err(|path| DistError::NonUtf8Path {
                path: path.display().to_string(),
            });
        }
    }

    Err(DistError::ArtifactNotFound {
        searched: query.searched_description(),
        target_dir: query.target_dir.to_owned(),
    })
}

struct Match {
    path: std::path::PathBuf,
    modified: SystemTime,
}

fn collect_matches(
    root: &Utf8Path,
    target_dir: &Utf8Path,
    profile_dir: &str,
    file_name: &str,
) -> Vec<Match> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_name().to_str() == Some(file_name))
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| in_profile_dir(entry.path(), target_dir.as_std_path(), profile_dir))
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some(Match {
                path: entry.into_path(),
                modified,
            })
        })
        .collect()
}

/// Whether `path` has a component equal to `profile_dir` below `target_dir`.
fn in_profile_dir(path: &Path, target_dir: &Path, profile_dir: &str) -> bool {
    let relative = path.strip_prefix(target_dir).unwrap_or(path);
    relative
        .components()
        .any(|component| component.as_os_str() == profile_dir)
}

fn newest(matches: Vec<Match>) -> Option<std::path::PathBuf> {
    matches
        .into_iter()
        .min_by(|a, b| {
            (Reverse(a.modified), &a.path).cmp(&(Reverse(b.modified), &b.path))
        })
        .map(|m| m.path)
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
