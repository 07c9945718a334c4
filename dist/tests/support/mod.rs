//! Test support utilities for dist behavioural tests.
//!
//! Provides a throwaway plugin project on disk and helpers for inspecting the
//! distribution directory and archive it produces.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// A plugin project rooted in a temporary directory.
pub struct TempProject {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl TempProject {
    /// Create an empty project directory.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf())
            .expect("temp dir should be UTF-8")
            .canonicalize_utf8()
            .expect("temp dir should canonicalise");
        Self { _temp: temp, root }
    }

    /// The project root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The distribution directory the builder writes to.
    pub fn dist_dir(&self) -> Utf8PathBuf {
        self.root.join("dist")
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &[u8]) {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().expect("file should have a parent"))
            .expect("failed to create parent directory");
        fs::write(path, contents).expect("failed to write project file");
    }
}

/// Every file under `dir` as a sorted list of `/`-separated relative paths
/// paired with its contents.
pub fn snapshot(dir: &Utf8Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<_> = walkdir::WalkDir::new(dir)
        .into_iter()
        .map(|entry| entry.expect("failed to walk directory"))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(dir)
                .expect("entry should be under dir")
                .to_string_lossy()
                .replace('\\', "/");
            let contents = fs::read(entry.path()).expect("failed to read file");
            (relative, contents)
        })
        .collect();
    files.sort();
    files
}

/// Entry names of the zip archive at `path`, in stored order.
pub fn archive_entries(path: &Utf8Path) -> Vec<String> {
    let file = fs::File::open(path).expect("failed to open archive");
    let mut archive = zip::ZipArchive::new(file).expect("archive should be a valid zip");
    (0..archive.len())
        .map(|index| {
            archive
                .by_index(index)
                .expect("failed to read archive entry")
                .name()
                .to_owned()
        })
        .collect()
}
