use crate::domain::SemanticVersion;
use crate::error::{ReleaseError, Result};

const VERSION_PLACEHOLDER: &str = "{version}";

/// Naming pattern for release tags and commit messages (e.g. "v{version}",
/// "chore(release): v{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new pattern, rejecting ones without a `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains(VERSION_PLACEHOLDER) {
            return Err(ReleaseError::config(format!(
                "Pattern '{}' must contain {} placeholder",
                pattern, VERSION_PLACEHOLDER
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &SemanticVersion) -> String {
        self.pattern.replace(VERSION_PLACEHOLDER, &version.to_string())
    }

    /// Version part of a tag name produced by this pattern
    /// Example: pattern="release-{version}", tag="release-1.2.3" -> Some("1.2.3")
    ///
    /// Returns `None` when the tag does not carry the pattern's prefix and
    /// suffix, or nothing is left between them.
    pub fn strip<'a>(&self, tag: &'a str) -> Option<&'a str> {
        let (prefix, suffix) = self.pattern.split_once(VERSION_PLACEHOLDER)?;
        tag.strip_prefix(prefix)?
            .strip_suffix(suffix)
            .filter(|version| !version.is_empty())
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            pattern: "v{version}".to_string(),
        }
    }
}
