//! Semantic wrapper for crate names.
//!
//! This module provides the [`CrateName`] newtype for type-safe handling of
//! the root crate's name throughout the dist pipeline.

use std::fmt;

/// A crate name as used in compiled artifact filenames.
///
/// Cargo replaces hyphens with underscores when naming build outputs, so a
/// package called `my-tool` produces `my_tool.wasm`. [`CrateName::from_package_name`]
/// applies that rule; the other constructors store the name verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrateName(String);

impl CrateName {
    /// Create a new crate name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the crate name from a Cargo package name.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_dist::crate_name::CrateName;
    ///
    /// let name = CrateName::from_package_name("my-cool-plugin");
    /// assert_eq!(name.as_str(), "my_cool_plugin");
    /// ```
    #[must_use]
    pub fn from_package_name(package_name: &str) -> Self {
        Self(package_name.replace('-', "_"))
    }

    /// Get the crate name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return true when the name is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Filename of the wasm module cargo emits for a `bin` target.
    #[must_use]
    pub fn module_filename(&self) -> String {
        format!("{}.{}", self.0, crate::discovery::MODULE_EXTENSION)
    }

    /// Filename of the wasm module cargo emits for a `cdylib` target.
    #[must_use]
    pub fn library_module_filename(&self) -> String {
        format!("lib{}.{}", self.0, crate::discovery::MODULE_EXTENSION)
    }
}

impl AsRef<str> for CrateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CrateName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for CrateName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for CrateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
