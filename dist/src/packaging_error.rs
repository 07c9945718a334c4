//! Error types for distribution packaging operations.
//!
//! Covers I/O failures, directory traversal problems, and zip encoding
//! errors that can occur while compressing the distribution directory.

use std::path::PathBuf;
use thiserror::Error;

/// Errors arising from distribution packaging operations.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// An I/O operation failed (reading source files, writing the archive).
    #[error("I/O error during packaging: {0}")]
    Io(#[from] std::io::Error),

    /// Walking the distribution directory failed.
    #[error("failed to walk distribution directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The zip writer rejected an entry or failed to finalise the archive.
    #[error("archive encoding error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A file found under the distribution directory lies outside it.
    #[error("file is not inside the distribution directory: {0}")]
    OutsideDistDir(PathBuf),

    /// A file's path cannot be stored as a UTF-8 archive entry name.
    #[error("file name is not valid UTF-8: {0}")]
    NonUtf8EntryName(PathBuf),
}
