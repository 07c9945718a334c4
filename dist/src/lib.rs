//! Plugin distribution builder library.
//!
//! This crate builds a Cargo project into a WebAssembly module, gathers the
//! module together with the assets its `manifest.json` declares into a
//! `dist/` directory, and optionally compresses that directory into a single
//! `.abp` archive. It is used by the `plugin-dist` CLI binary and can be
//! driven programmatically through [`pipeline::run_pipeline`].
//!
//! # Modules
//!
//! - [`builder`] - Build profile resolution and `cargo build` invocation
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Runtime configuration from arguments and environment
//! - [`crate_name`] - Semantic wrapper for crate names
//! - [`discovery`] - Compiled module discovery in cargo's output tree
//! - [`error`] - Semantic error types and exit codes
//! - [`executor`] - Subprocess execution abstraction
//! - [`manifest`] - Plugin manifest loading
//! - [`metadata`] - Cargo metadata queries and root package selection
//! - [`naming`] - Archive naming
//! - [`output`] - User-facing output formatting
//! - [`packaging`] - Distribution archive creation
//! - [`packaging_error`] - Error types for archive creation
//! - [`pipeline`] - Dist pipeline orchestration
//! - [`stager`] - Distribution directory assembly

pub mod builder;
pub mod cli;
pub mod config;
pub mod crate_name;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod manifest;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod packaging;
pub mod packaging_error;
pub mod pipeline;
pub mod stager;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
