use thiserror::Error;

/// Unified error type for release-lit operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Version parsing error: {0}")]
    Parse(String),

    #[error("Malformed commit {hash}: '{subject}' is not a conventional commit")]
    MalformedCommit { hash: String, subject: String },

    #[error("Cannot decode commit {hash}: {reason}")]
    Decode { hash: String, reason: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unsupported project type: '{0}' (expected node, python or go)")]
    UnsupportedProjectType(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Changelog error: {0}")]
    Changelog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-lit
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a version parse error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        ReleaseError::Parse(msg.into())
    }

    /// Create a malformed-commit error carrying the commit identity
    pub fn malformed_commit(hash: impl Into<String>, subject: impl Into<String>) -> Self {
        ReleaseError::MalformedCommit {
            hash: hash.into(),
            subject: subject.into(),
        }
    }

    /// Create a decode error for a commit record that could not be read
    pub fn decode(hash: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::Decode {
            hash: hash.into(),
            reason: reason.into(),
        }
    }

    /// Create a repository error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        ReleaseError::Repository(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    /// Create a changelog error with context
    pub fn changelog(msg: impl Into<String>) -> Self {
        ReleaseError::Changelog(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Whether a batch may skip the offending item and carry on.
    ///
    /// Only per-item parse/classification/decoding failures are recoverable;
    /// anything touching repository state or the filesystem aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ReleaseError::Parse(_)
                | ReleaseError::MalformedCommit { .. }
                | ReleaseError::Decode { .. }
        )
    }
}
