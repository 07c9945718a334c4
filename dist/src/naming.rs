//! Archive naming for packaged distributions.
//!
//! The archive is named after the plugin: the manifest's `name`, falling back
//! to the crate name. Characters that are invalid in filenames on common
//! platforms are replaced so the name is safe to write anywhere.

use std::fmt;

/// File extension of packaged distributions.
pub const ARCHIVE_EXTENSION: &str = "abp";

/// Name used when neither the manifest nor the crate supplies one.
const FALLBACK_NAME: &str = "plugin";

/// Characters replaced with `_` in archive names.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// A sanitised, non-empty archive base name.
///
/// # Examples
///
/// ```
/// use plugin_dist::naming::PackageName;
///
/// let name = PackageName::new(Some("My:Tool?"), None);
/// assert_eq!(name.as_str(), "My_Tool_");
/// assert_eq!(name.filename(), "My_Tool_.abp");
///
/// assert_eq!(PackageName::new(None, Some("my_tool")).as_str(), "my_tool");
/// assert_eq!(PackageName::new(Some(" .. "), None).as_str(), "plugin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageName(String);

impl PackageName {
    /// Derive the archive name from the manifest name and the crate name.
    ///
    /// The first non-blank of `manifest_name` and `crate_name` is used, or
    /// `plugin` when both are blank. Each invalid character becomes `_`, then
    /// leading and trailing spaces and periods are trimmed. An empty result
    /// becomes `plugin`.
    #[must_use]
    pub fn new(manifest_name: Option<&str>, crate_name: Option<&str>) -> Self {
        let raw = [manifest_name, crate_name]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
            .unwrap_or(FALLBACK_NAME);

        let cleaned: String = raw
            .chars()
            .map(|ch| if INVALID_CHARS.contains(&ch) { '_' } else { ch })
            .collect();
        let safe = cleaned.trim_matches([' ', '.']);

        if safe.is_empty() {
            Self(FALLBACK_NAME.to_owned())
        } else {
            Self(safe.to_owned())
        }
    }

    /// The sanitised name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Archive filename, `<name>.abp`.
    #[must_use]
    pub fn filename(&self) -> String {
        format!("{}.{ARCHIVE_EXTENSION}", self.0)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::manifest_name(Some("MyTool"), Some("my_tool"), "MyTool")]
    #[case::trimmed(Some("  MyTool \t"), None, "MyTool")]
    #[case::crate_fallback(None, Some("my_tool"), "my_tool")]
    #[case::blank_manifest_name(Some("   "), Some("my_tool"), "my_tool")]
    #[case::default(None, None, "plugin")]
    #[case::all_invalid_chars(Some("a<b>c:d\"e/f\\g|h?i*j"), None, "a_b_c_d_e_f_g_h_i_j")]
    #[case::dots_and_spaces_trimmed(Some(". My Tool ."), None, "My Tool")]
    #[case::only_dots(Some("..."), Some("ignored"), "plugin")]
    #[case::inner_dots_kept(Some("my.tool"), None, "my.tool")]
    #[case::unicode_kept(Some("Outil été"), None, "Outil été")]
    fn sanitises_package_name(
        #[case] manifest_name: Option<&str>,
        #[case] crate_name: Option<&str>,
        #[case] expected: &str,
    ) {
        let name = PackageName::new(manifest_name, crate_name);
        assert_eq!(name.as_str(), expected);
    }

    #[test]
    fn filename_appends_extension() {
        let name = PackageName::new(Some("MyTool"), None);
        assert_eq!(name.filename(), "MyTool.abp");
        assert_eq!(name.to_string(), "MyTool");
    }
}
