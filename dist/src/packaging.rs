//! Distribution packaging.
//!
//! Compresses everything under the distribution directory into a single
//! deflate-compressed zip container carrying the `.abp` extension. Entries
//! are stored at their `/`-separated path relative to the directory, in
//! sorted order, with the source file's modification time. Zip timestamps
//! carry no zone, so they are written in local time when the local offset can
//! be determined and in UTC otherwise.

use crate::packaging_error::PackagingError;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use time::{OffsetDateTime, UtcOffset};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Output produced by [`package_dist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutput {
    /// Path to the written archive.
    pub archive_path: Utf8PathBuf,
    /// Entry names in the order they were written.
    pub entries: Vec<String>,
}

/// A file to be written into the archive.
#[derive(Debug)]
struct ArchiveEntry {
    source: PathBuf,
    name: String,
}

/// Compress every file under `dist_dir` into `archive_path`.
///
/// The archive itself is skipped if it already lies inside `dist_dir`, so a
/// previous run's archive is overwritten rather than nested. Empty
/// directories are not recorded.
///
/// # Errors
///
/// Returns [`PackagingError::Walk`] if the directory cannot be traversed,
/// [`PackagingError::Io`] if a file cannot be read or the archive cannot be
/// written, or [`PackagingError::Zip`] if the zip writer fails.
pub fn package_dist(
    dist_dir: &Utf8Path,
    archive_path: &Utf8Path,
) -> Result<PackageOutput, PackagingError> {
    if let Some(parent) = archive_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let entries = collect_entries(dist_dir.as_std_path(), archive_path.as_std_path())?;
    log::debug!("packaging {} file(s) into {archive_path}", entries.len());
    write_archive(archive_path, &entries)?;

    Ok(PackageOutput {
        archive_path: archive_path.to_owned(),
        entries: entries.into_iter().map(|entry| entry.name).collect(),
    })
}

/// Gather the files to archive, sorted by entry name.
fn collect_entries(
    dist_dir: &Path,
    archive_path: &Path,
) -> Result<Vec<ArchiveEntry>, PackagingError> {
    let root = fs::canonicalize(dist_dir)?;
    let archive = canonical_location(archive_path)?;

    let mut entries = Vec::new();
    for entry in WalkDir::new(&root).min_depth(1) {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || path == archive {
            continue;
        }
        entries.push(ArchiveEntry {
            name: entry_name(&root, path)?,
            source: path.to_path_buf(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Resolve `path` through its parent directory, which must exist.
fn canonical_location(path: &Path) -> io::Result<PathBuf> {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            Ok(fs::canonicalize(parent)?.join(name))
        }
        _ => fs::canonicalize(path),
    }
}

/// Entry name for `path`: its path below `root`, joined with `/`.
fn entry_name(root: &Path, path: &Path) -> Result<String, PackagingError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| PackagingError::OutsideDistDir(path.to_path_buf()))?;

    let parts = relative
        .components()
        .map(|component| {
            component
                .as_os_str()
                .to_str()
                .ok_or_else(|| PackagingError::NonUtf8EntryName(path.to_path_buf()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join("/"))
}

fn write_archive(archive_path: &Utf8Path, entries: &[ArchiveEntry]) -> Result<(), PackagingError> {
    let file = fs::File::create(archive_path)?;
    let mut writer = ZipWriter::new(file);
    let base = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        let mut source = fs::File::open(&entry.source)?;
        let modified = source.metadata()?.modified()?;
        writer.start_file(entry.name.as_str(), base.last_modified_time(zip_timestamp(modified)))?;
        io::copy(&mut source, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}

/// Convert a filesystem timestamp to the zip format's resolution and range.
///
/// Times outside the representable range (1980 to 2107) fall back to the
/// format's epoch.
fn zip_timestamp(modified: SystemTime) -> DateTime {
    let utc = OffsetDateTime::from(modified);
    let local = UtcOffset::current_local_offset().map_or(utc, |offset| utc.to_offset(offset));
    DateTime::try_from(local).unwrap_or_default()
}
