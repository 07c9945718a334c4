//! Plugin manifest loading.
//!
//! The project's `manifest.json` names the plugin, the filename its compiled
//! module should carry inside the distribution, and the auxiliary files that
//! ship alongside it. Only the keys this tool needs are modelled; any other
//! keys in the file are ignored.

use crate::error::{DistError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;

/// Filename of the manifest at the project root.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// The subset of `manifest.json` that drives distribution assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PluginManifest {
    /// Display name of the plugin, used to name the packaged archive.
    #[serde(default)]
    pub name: Option<String>,
    /// Desired path of the compiled module inside the distribution.
    #[serde(default)]
    pub entry: Option<String>,
    /// Optional icon to bundle.
    #[serde(default)]
    pub icon: Option<String>,
    /// Further files or directories to bundle verbatim.
    ///
    /// Read leniently: a value that is not a list is ignored, `null` items are
    /// dropped, numbers are taken as their decimal text, and other non-string
    /// items are skipped with a warning.
    #[serde(default, deserialize_with = "lenient_file_list")]
    pub additional_files: Vec<String>,
}

impl PluginManifest {
    /// Load the manifest from `<project_root>/manifest.json`.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::ManifestNotFound`] if the file does not exist,
    /// [`DistError::InvalidManifest`] if it is not valid JSON of the expected
    /// shape, or [`DistError::Io`] if it cannot be read.
    pub fn load(project_root: &Utf8Path) -> Result<Self> {
        let path = manifest_path(project_root);
        if !path.exists() {
            return Err(DistError::ManifestNotFound { path });
        }

        let contents = fs::read_to_string(&path)?;
        Self::parse(&contents).map_err(|e| DistError::InvalidManifest {
            path,
            reason: e.to_string(),
        })
    }

    /// Parse manifest JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error for malformed input.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_dist::manifest::PluginManifest;
    ///
    /// let manifest = PluginManifest::parse(r#"{"name":"MyTool","entry":"main.wasm"}"#)
    ///     .expect("valid manifest");
    /// assert_eq!(manifest.entry(), Some("main.wasm"));
    /// assert_eq!(manifest.icon(), None);
    /// ```
    pub fn parse(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The declared entry path, if non-empty.
    #[must_use]
    pub fn entry(&self) -> Option<&str> {
        non_empty(self.entry.as_deref())
    }

    /// The final path component of the declared entry, if any.
    ///
    /// Used as the first candidate name during artifact discovery.
    #[must_use]
    pub fn entry_file_name(&self) -> Option<&str> {
        self.entry()
            .and_then(|entry| entry.rsplit(['/', '\\']).next())
            .filter(|name| !name.is_empty())
    }

    /// The declared icon path, if non-empty.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        non_empty(self.icon.as_deref())
    }

    /// Declared additional files in manifest order.
    pub fn additional_files(&self) -> impl Iterator<Item = &str> {
        self.additional_files.iter().map(String::as_str)
    }
}

/// Return the manifest path for a project root.
#[must_use]
pub fn manifest_path(project_root: &Utf8Path) -> Utf8PathBuf {
    project_root.join(MANIFEST_FILE_NAME)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn lenient_file_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().filter_map(file_list_item).collect()),
        Value::Null => Ok(Vec::new()),
        other => {
            log::warn!("ignoring additional_files: expected a list, found {other}");
            Ok(Vec::new())
        }
    }
}

fn file_list_item(item: Value) -> Option<String> {
    match item {
        Value::String(path) => Some(path),
        Value::Number(number) => Some(number.to_string()),
        Value::Null => None,
        other => {
            log::warn!("ignoring additional_files item {other}: not a path");
            None
        }
    }
}
