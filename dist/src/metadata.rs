//! Cargo metadata queries.
//!
//! After a successful build the pipeline asks cargo where it put the output
//! tree and which package is the project's root, so artifact discovery knows
//! which directory to search and which crate name to look for.

use crate::crate_name::CrateName;
use crate::error::{DistError, Result};
use crate::executor::{CommandExecutor, exit_code};
use camino::{Utf8Path, Utf8PathBuf};
use cargo_metadata::{Metadata, MetadataCommand, Package};

/// Arguments for the metadata invocation. Dependency resolution is skipped.
const METADATA_ARGS: &[&str] = &["metadata", "--no-deps", "--format-version", "1"];

/// What the pipeline needs to know about the built project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    /// Cargo's build output directory.
    pub target_directory: Utf8PathBuf,
    /// Crate name of the root package, normalised for artifact filenames.
    pub crate_name: Option<CrateName>,
}

impl ProjectInfo {
    /// Extract project information from a metadata report.
    #[must_use]
    pub fn from_metadata(metadata: &Metadata, project_root: &Utf8Path) -> Self {
        let root_manifest = project_root.join("Cargo.toml");
        let crate_name = select_root_package(metadata, &root_manifest)
            .map(|package| CrateName::from_package_name(&package.name.to_string()))
            .filter(|name| !name.is_empty());

        Self {
            target_directory: metadata.target_directory.clone(),
            crate_name,
        }
    }
}

/// Run `cargo metadata` for the project and parse its report.
///
/// # Errors
///
/// Returns [`DistError::MetadataFailed`] with cargo's exit code and captured
/// output when the query fails, or [`DistError::InvalidMetadata`] when the
/// output cannot be parsed.
pub fn query_metadata(
    executor: &dyn CommandExecutor,
    cargo: &str,
    project_root: &Utf8Path,
) -> Result<Metadata> {
    let args: Vec<String> = METADATA_ARGS.iter().map(|&arg| arg.to_owned()).collect();
    let output = executor.output(cargo, &args, project_root)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = if stderr.trim().is_empty() {
            String::from_utf8_lossy(&output.stdout).into_owned()
        } else {
            stderr.into_owned()
        };
        return Err(DistError::MetadataFailed {
            code: exit_code(output.status),
            message: message.trim_end().to_owned(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    MetadataCommand::parse(&*stdout).map_err(|e| DistError::InvalidMetadata {
        reason: e.to_string(),
    })
}

/// Pick the package that represents the project being distributed.
///
/// Preference order: the package whose manifest is `root_manifest`, the
/// first workspace member, then the first package listed.
#[must_use]
pub fn select_root_package<'m>(
    metadata: &'m Metadata,
    root_manifest: &Utf8Path,
) -> Option<&'m Package> {
    let root_manifest = normalise(root_manifest);

    metadata
        .packages
        .iter()
        .find(|package| normalise(&package.manifest_path) == root_manifest)
        .or_else(|| first_workspace_member(metadata))
        .or_else(|| metadata.packages.first())
}

fn first_workspace_member(metadata: &Metadata) -> Option<&Package> {
    let member = metadata.workspace_members.first()?;
    metadata.packages.iter().find(|package| &package.id == member)
}

/// Resolve symlinks and relative segments where the path exists.
fn normalise(path: &Utf8Path) -> Utf8PathBuf {
    path.canonicalize_utf8().unwrap_or_else(|_| path.to_owned())
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
