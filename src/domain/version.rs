//! Semantic version model
//!
//! Versions are parsed loosely: the major component is mandatory, minor and
//! patch default to 0 when absent, and an optional `v`/`V` prefix is accepted.
//! Pre-release and build-metadata suffixes follow https://semver.org/#spec-item-9
//! and https://semver.org/#spec-item-10.
//!
//! A [`SemanticVersion`] is immutable: every increment returns a new value.

use crate::domain::ReleaseLevel;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

/// Loose version grammar. Suffix identifiers are captured broadly and then
/// checked by [`validate_prerelease`] / [`validate_metadata`].
static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[vV]?(0|[1-9][0-9]*)(?:\.(0|[1-9][0-9]*))?(?:\.(0|[1-9][0-9]*))?(?:-([^+]*))?(?:\+(.*))?$",
    )
    .expect("version regex is valid")
});

/// A semantic version together with the literal it was parsed from.
///
/// Equality and hashing ignore the original literal, so `v1.2.3` and `1.2.3`
/// compare equal.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    major: u64,
    minor: u64,
    patch: u64,
    pre: Option<String>,
    metadata: Option<String>,
    original: String,
}

impl SemanticVersion {
    /// Create a plain release version.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        let mut version = SemanticVersion {
            major,
            minor,
            patch,
            pre: None,
            metadata: None,
            original: String::new(),
        };
        version.original = version.to_string();
        version
    }

    /// Parse a loosely formed version literal such as `2`, `v2.1`,
    /// `2.1.3-rc.1+build.5`.
    ///
    /// # Returns
    /// * `Ok(SemanticVersion)` - Parsed version, original literal preserved
    /// * `Err(ReleaseError::Parse)` - If the literal violates the grammar
    pub fn parse(text: &str) -> Result<Self> {
        let caps = VERSION_REGEX
            .captures(text)
            .ok_or_else(|| ReleaseError::parse(format!("Invalid version string: '{}'", text)))?;

        let major = parse_segment(caps.get(1).map(|m| m.as_str()), "major", text)?;
        let minor = parse_segment(caps.get(2).map(|m| m.as_str()), "minor", text)?;
        let patch = parse_segment(caps.get(3).map(|m| m.as_str()), "patch", text)?;

        let pre = caps.get(4).map(|m| m.as_str().to_string());
        if let Some(pre) = &pre {
            validate_prerelease(pre)?;
        }

        let metadata = caps.get(5).map(|m| m.as_str().to_string());
        if let Some(metadata) = &metadata {
            validate_metadata(metadata)?;
        }

        Ok(SemanticVersion {
            major,
            minor,
            patch,
            pre,
            metadata,
            original: text.to_string(),
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn pre_release(&self) -> Option<&str> {
        self.pre.as_deref()
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    /// The literal this version came from, or the prefixed rendering after an
    /// increment.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The leading `v`/`V` of the original literal, if any.
    pub fn prefix(&self) -> &str {
        match self.original.as_bytes().first() {
            Some(b'v') => "v",
            Some(b'V') => "V",
            _ => "",
        }
    }

    /// Next patch version.
    ///
    /// A pre-release of X has lower precedence than X itself, so the next
    /// patch of `1.2.3-alpha` is `1.2.3`. Metadata is always dropped.
    ///
    /// # Returns
    /// * `Err(ReleaseError::Parse)` - If the patch component is already `u64::MAX`
    pub fn inc_patch(&self) -> Result<Self> {
        if self.pre.is_some() {
            Ok(self.derive(self.major, self.minor, self.patch))
        } else {
            let patch = self.increment(self.patch, "patch")?;
            Ok(self.derive(self.major, self.minor, patch))
        }
    }

    /// Next minor version: patch reset, suffixes dropped.
    pub fn inc_minor(&self) -> Result<Self> {
        let minor = self.increment(self.minor, "minor")?;
        Ok(self.derive(self.major, minor, 0))
    }

    /// Next major version: minor and patch reset, suffixes dropped.
    pub fn inc_major(&self) -> Result<Self> {
        let major = self.increment(self.major, "major")?;
        Ok(self.derive(major, 0, 0))
    }

    /// Apply a release level. `ReleaseLevel::None` hands the version back
    /// unchanged.
    pub fn bump(self, level: ReleaseLevel) -> Result<Self> {
        match level {
            ReleaseLevel::Major => self.inc_major(),
            ReleaseLevel::Minor => self.inc_minor(),
            ReleaseLevel::Patch => self.inc_patch(),
            ReleaseLevel::None => Ok(self),
        }
    }

    /// Compare by semver precedence: build metadata is ignored and a
    /// pre-release sorts below its associated release.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| self.prerelease_key().cmp(&other.prerelease_key()))
    }

    fn prerelease_key(&self) -> semver::Prerelease {
        self.pre
            .as_deref()
            .and_then(|pre| semver::Prerelease::new(pre).ok())
            .unwrap_or(semver::Prerelease::EMPTY)
    }

    fn increment(&self, component: u64, name: &str) -> Result<u64> {
        component.checked_add(1).ok_or_else(|| {
            ReleaseError::parse(format!(
                "Cannot increment {} component of '{}': already at maximum",
                name, self.original
            ))
        })
    }

    fn derive(&self, major: u64, minor: u64, patch: u64) -> Self {
        let mut next = SemanticVersion::new(major, minor, patch);
        next.original = format!("{}{}", self.prefix(), next);
        next
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        if let Some(metadata) = &self.metadata {
            write!(f, "+{}", metadata)?;
        }
        Ok(())
    }
}

impl FromStr for SemanticVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.pre == other.pre
            && self.metadata == other.metadata
    }
}

impl Eq for SemanticVersion {}

impl Hash for SemanticVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.pre.hash(state);
        self.metadata.hash(state);
    }
}

fn parse_segment(segment: Option<&str>, name: &str, text: &str) -> Result<u64> {
    match segment {
        None => Ok(0),
        Some(digits) => digits.parse::<u64>().map_err(|e| {
            ReleaseError::parse(format!(
                "Invalid {} segment '{}' in '{}': {}",
                name, digits, text, e
            ))
        }),
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Identifiers are non-empty `[0-9A-Za-z-]` runs; numeric ones carry no
/// leading zero.
fn validate_prerelease(pre: &str) -> Result<()> {
    for ident in pre.split('.') {
        if ident.is_empty() {
            return Err(ReleaseError::parse(format!(
                "Empty pre-release identifier in '{}'",
                pre
            )));
        }
        if ident.chars().all(|c| c.is_ascii_digit()) {
            if ident.len() > 1 && ident.starts_with('0') {
                return Err(ReleaseError::parse(format!(
                    "Pre-release identifier '{}' starts with 0",
                    ident
                )));
            }
        } else if !ident.chars().all(is_identifier_char) {
            return Err(ReleaseError::parse(format!(
                "Invalid pre-release identifier: '{}'",
                ident
            )));
        }
    }
    Ok(())
}

/// Same alphabet as pre-release, but leading zeros are allowed.
fn validate_metadata(metadata: &str) -> Result<()> {
    for ident in metadata.split('.') {
        if ident.is_empty() || !ident.chars().all(is_identifier_char) {
            return Err(ReleaseError::parse(format!(
                "Invalid metadata string: '{}'",
                metadata
            )));
        }
    }
    Ok(())
}
