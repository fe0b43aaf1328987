use crate::domain::ReleaseLevel;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// `<type>(<scope>)!:<message>` on the subject line.
static CONVENTIONAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?P<type>\w+)(?:\((?P<scope>[\w$.\-*/ ]*)\))?(?P<breaking>!)?:(?P<message>.*)$")
        .expect("conventional commit regex is valid")
});

/// Marker that flags a breaking change anywhere in the commit body.
const BREAKING_CHANGE_MARKER: &str = "BREAKING CHANGE";

/// Short and long form of a commit hash
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitId {
    pub short: String,
    pub long: String,
}

/// Name and email of whoever committed a change
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// Commit record as supplied by a repository history provider
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCommit {
    pub id: CommitId,
    pub committer: Committer,
    pub date: String,
    pub subject: String,
    pub body: String,
}

/// Fields derived from a subject line that follows the convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub r#type: String,
    pub scope: Option<String>,
    pub is_breaking_change: bool,
    pub message: String,
}

/// Parse a subject/body pair according to the conventional commits grammar.
///
/// The commit is breaking when the subject carries `!` before the colon or
/// the body mentions `BREAKING CHANGE`. Type, scope and message are trimmed;
/// an empty scope counts as no scope.
///
/// Returns `None` when the subject does not follow the convention.
pub fn classify(subject: &str, body: &str) -> Option<Classification> {
    let caps = CONVENTIONAL_REGEX.captures(subject)?;

    let r#type = caps.name("type")?.as_str().trim().to_string();
    let scope = caps
        .name("scope")
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let has_marker = caps.name("breaking").is_some();
    let message = caps
        .name("message")
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    Some(Classification {
        r#type,
        scope,
        is_breaking_change: has_marker || body.contains(BREAKING_CHANGE_MARKER),
        message,
    })
}

/// A commit whose subject has been classified.
///
/// Only obtainable through [`ConventionalCommit::from_raw`], so the derived
/// fields are always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
    pub id: CommitId,
    pub committer: Committer,
    pub date: String,
    pub subject: String,
    pub body: String,
    pub r#type: String,
    pub scope: Option<String>,
    pub is_breaking_change: bool,
    pub message: String,
}

impl ConventionalCommit {
    /// Classify a raw commit.
    ///
    /// # Returns
    /// * `Ok(ConventionalCommit)` - Commit with type, scope, breaking flag and message
    /// * `Err(ReleaseError::MalformedCommit)` - If the subject does not follow the convention
    pub fn from_raw(raw: RawCommit) -> Result<Self> {
        let Some(classification) = classify(&raw.subject, &raw.body) else {
            return Err(ReleaseError::malformed_commit(&raw.id.long, &raw.subject));
        };

        Ok(ConventionalCommit {
            id: raw.id,
            committer: raw.committer,
            date: raw.date,
            subject: raw.subject,
            body: raw.body,
            r#type: classification.r#type,
            scope: classification.scope,
            is_breaking_change: classification.is_breaking_change,
            message: classification.message,
        })
    }

    pub fn is_feature(&self) -> bool {
        self.r#type == "feat"
    }

    pub fn is_fix(&self) -> bool {
        self.r#type == "fix"
    }

    /// Release level this commit alone would warrant
    pub fn release_level(&self) -> ReleaseLevel {
        if self.is_breaking_change {
            ReleaseLevel::Major
        } else if self.is_feature() {
            ReleaseLevel::Minor
        } else if self.is_fix() {
            ReleaseLevel::Patch
        } else {
            ReleaseLevel::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(subject: &str, body: &str) -> RawCommit {
        RawCommit {
            id: CommitId {
                short: "abc1234".to_string(),
                long: "abc1234567890abc1234567890abc1234567890a".to_string(),
            },
            subject: subject.to_string(),
            body: body.to_string(),
            ..RawCommit::default()
        }
    }

    #[test]
    fn test_classify_with_scope() {
        let c = classify("feat(scope): add new feature", "").unwrap();
        assert_eq!(c.r#type, "feat");
        assert_eq!(c.scope, Some("scope".to_string()));
        assert!(!c.is_breaking_change);
        assert_eq!(c.message, "add new feature");
    }

    #[test]
    fn test_classify_breaking_marker() {
        let c = classify("feat!: add breaking change", "").unwrap();
        assert_eq!(c.r#type, "feat");
        assert_eq!(c.scope, None);
        assert!(c.is_breaking_change);
        assert_eq!(c.message, "add breaking change");
    }

    #[test]
    fn test_classify_breaking_marker_with_scope() {
        let c = classify("fix(api)!: drop v1 endpoints", "").unwrap();
        assert_eq!(c.scope, Some("api".to_string()));
        assert!(c.is_breaking_change);
    }

    #[test]
    fn test_classify_breaking_body_marker() {
        let c = classify("fix: rename field", "BREAKING CHANGE: field renamed").unwrap();
        assert!(c.is_breaking_change);

        let c = classify("refactor: tidy", "Some text\nmentions BREAKING CHANGE inline").unwrap();
        assert!(c.is_breaking_change);
    }

    #[test]
    fn test_classify_body_marker_is_case_sensitive() {
        let c = classify("fix: rename field", "breaking change: lower case").unwrap();
        assert!(!c.is_breaking_change);
    }

    #[test]
    fn test_classify_trims_parts() {
        let c = classify("docs( readme ):    fix typo   ", "").unwrap();
        assert_eq!(c.r#type, "docs");
        assert_eq!(c.scope, Some("readme".to_string()));
        assert_eq!(c.message, "fix typo");
    }

    #[test]
    fn test_classify_scope_character_class() {
        let c = classify("chore(deps/dev-tools.*$): bump", "").unwrap();
        assert_eq!(c.scope, Some("deps/dev-tools.*$".to_string()));

        assert!(classify("chore(a,b): bump", "").is_none());
    }

    #[test]
    fn test_classify_empty_scope_is_none() {
        let c = classify("feat(): nothing in scope", "").unwrap();
        assert_eq!(c.scope, None);
    }

    #[test]
    fn test_classify_unknown_type_is_accepted() {
        let c = classify("wip: half done", "").unwrap();
        assert_eq!(c.r#type, "wip");
    }

    #[test]
    fn test_classify_rejects_non_conventional() {
        assert!(classify("not a conventional commit message", "").is_none());
        assert!(classify("Merge branch 'main' into dev", "").is_none());
        assert!(classify(": missing type", "").is_none());
        assert!(classify("", "").is_none());
    }

    #[test]
    fn test_from_raw_keeps_identity() {
        let commit = ConventionalCommit::from_raw(raw("fix(ui): button color", "")).unwrap();
        assert_eq!(commit.id.short, "abc1234");
        assert_eq!(commit.subject, "fix(ui): button color");
        assert_eq!(commit.r#type, "fix");
        assert!(commit.is_fix());
    }

    #[test]
    fn test_from_raw_malformed() {
        let err = ConventionalCommit::from_raw(raw("not a conventional commit message", ""))
            .unwrap_err();
        match err {
            ReleaseError::MalformedCommit { hash, subject } => {
                assert_eq!(hash, "abc1234567890abc1234567890abc1234567890a");
                assert_eq!(subject, "not a conventional commit message");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_release_level_per_commit() {
        let level = |s: &str, b: &str| ConventionalCommit::from_raw(raw(s, b)).unwrap().release_level();
        assert_eq!(level("feat: x", ""), ReleaseLevel::Minor);
        assert_eq!(level("fix: x", ""), ReleaseLevel::Patch);
        assert_eq!(level("chore: x", ""), ReleaseLevel::None);
        assert_eq!(level("docs!: x", ""), ReleaseLevel::Major);
        assert_eq!(level("chore: x", "BREAKING CHANGE: y"), ReleaseLevel::Major);
    }
}
