use std::fmt;

/// Non-fatal issues met while reading repository history.
/// The offending item is skipped and the run continues.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Tag exists but cannot be parsed as a semantic version
    UnparsableTag { tag: String, reason: String },
    /// Commit subject does not follow the conventional commit grammar
    MalformedCommit { hash: String, subject: String },
    /// Commit record could not be decoded
    UndecodableCommit { hash: String, reason: String },
    /// No tag to bump from; the release starts at the baseline version
    NoPreviousRelease { baseline: String },
    /// Only non-releasing commit types since the latest tag
    NoReleaseNeeded { latest_tag: String },
}

fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Ignoring tag '{}': {}", tag, reason)
            }
            BoundaryWarning::MalformedCommit { hash, subject } => {
                write!(
                    f,
                    "Skipping commit {}: '{}' is not a conventional commit",
                    short_hash(hash),
                    subject
                )
            }
            BoundaryWarning::UndecodableCommit { hash, reason } => {
                write!(
                    f,
                    "Skipping commit {}: cannot decode ({})",
                    short_hash(hash),
                    reason
                )
            }
            BoundaryWarning::NoPreviousRelease { baseline } => {
                write!(f, "No version tags found, starting at {}", baseline)
            }
            BoundaryWarning::NoReleaseNeeded { latest_tag } => {
                write!(
                    f,
                    "No feat, fix or breaking commits since tag '{}', nothing to release",
                    latest_tag
                )
            }
        }
    }
}
