//! Error types for the plugin distribution builder.
//!
//! This module defines semantic error variants for every fatal condition of a
//! dist run. Each variant maps to the exit status the process should report,
//! so a failing cargo invocation surfaces with cargo's own exit code.

use crate::packaging_error::PackagingError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Exit status for failures that do not originate from a subprocess.
pub const GENERIC_FAILURE_CODE: i32 = 1;

/// Errors that can occur while building and assembling a distribution.
#[derive(Debug, Error)]
pub enum DistError {
    /// The project has no `manifest.json` at its root.
    #[error("manifest.json not found: {path}")]
    ManifestNotFound {
        /// Path where the manifest was expected.
        path: Utf8PathBuf,
    },

    /// The manifest exists but could not be parsed.
    #[error("invalid manifest at {path}: {reason}")]
    InvalidManifest {
        /// Path to the manifest that failed to parse.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// `cargo build` exited unsuccessfully.
    #[error("cargo build failed with exit code {code}")]
    BuildFailed {
        /// Exit code reported by cargo.
        code: i32,
    },

    /// `cargo metadata` exited unsuccessfully.
    #[error("cargo metadata failed: {message}")]
    MetadataFailed {
        /// Exit code reported by cargo.
        code: i32,
        /// Captured error output.
        message: String,
    },

    /// `cargo metadata` produced output that is not a valid metadata report.
    #[error("invalid cargo metadata output: {reason}")]
    InvalidMetadata {
        /// Description of the parse error.
        reason: String,
    },

    /// No compiled module matched any candidate filename.
    #[error("wasm artifact not found. Looked for {searched} in {target_dir}")]
    ArtifactNotFound {
        /// Human-readable description of the names searched for.
        searched: String,
        /// Build output directory that was searched.
        target_dir: Utf8PathBuf,
    },

    /// A path on disk could not be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// Copying an item into the distribution directory failed.
    #[error("staging failed for {path}: {source}")]
    StagingFailed {
        /// Source path that could not be staged.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Compressing the distribution directory failed.
    #[error(transparent)]
    Packaging(#[from] PackagingError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

impl DistError {
    /// Return the process exit code for this error.
    ///
    /// Subprocess failures mirror the subprocess's own exit code; everything
    /// else exits with [`GENERIC_FAILURE_CODE`].
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::BuildFailed { code } | Self::MetadataFailed { code, .. } => *code,
            _ => GENERIC_FAILURE_CODE,
        }
    }
}

/// Result type alias using [`DistError`].
pub type Result<T> = std::result::Result<T, DistError>;
