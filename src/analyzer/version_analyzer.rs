use crate::boundary::BoundaryWarning;
use crate::domain::{ConventionalCommit, RawCommit, ReleaseLevel, SemanticVersion, TagPattern};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use tracing::{debug, instrument};

/// Highest release level warranted by a set of commits.
///
/// Empty input resolves to [`ReleaseLevel::None`].
pub fn resolve_level(commits: &[ConventionalCommit]) -> ReleaseLevel {
    commits
        .iter()
        .map(ConventionalCommit::release_level)
        .max()
        .unwrap_or_default()
}

/// A release tag together with the version it names
#[derive(Debug, Clone, PartialEq)]
pub struct VersionTag {
    pub name: String,
    pub version: SemanticVersion,
}

/// Read versions out of tag names, newest first by semver precedence.
///
/// The version is whatever `pattern` leaves after removing its prefix and
/// suffix. Tags that do not follow the pattern, or whose version part does
/// not parse, are skipped with a warning.
pub fn collect_versions<I, S>(
    tags: I,
    pattern: &TagPattern,
) -> (Vec<VersionTag>, Vec<BoundaryWarning>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut versions = Vec::new();
    let mut warnings = Vec::new();

    for tag in tags {
        let tag = tag.as_ref();
        let Some(text) = pattern.strip(tag) else {
            warnings.push(BoundaryWarning::UnparsableTag {
                tag: tag.to_string(),
                reason: format!("does not match pattern '{}'", pattern.pattern),
            });
            continue;
        };

        match SemanticVersion::parse(text) {
            Ok(version) => versions.push(VersionTag {
                name: tag.to_string(),
                version,
            }),
            Err(e) => warnings.push(BoundaryWarning::UnparsableTag {
                tag: tag.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    versions.sort_by(|a, b| b.version.cmp_precedence(&a.version));
    (versions, warnings)
}

/// Classify a batch of commit records, skipping the ones that are
/// undecodable or not conventional.
///
/// Errors that are not recoverable are returned as-is.
pub fn classify_commits(
    records: Vec<Result<RawCommit>>,
) -> Result<(Vec<ConventionalCommit>, Vec<BoundaryWarning>)> {
    let mut commits = Vec::new();
    let mut warnings = Vec::new();

    for record in records {
        match record.and_then(ConventionalCommit::from_raw) {
            Ok(commit) => commits.push(commit),
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(ReleaseError::MalformedCommit { hash, subject }) => {
                warnings.push(BoundaryWarning::MalformedCommit { hash, subject })
            }
            Err(ReleaseError::Decode { hash, reason }) => {
                warnings.push(BoundaryWarning::UndecodableCommit { hash, reason })
            }
            Err(e) => warnings.push(BoundaryWarning::UndecodableCommit {
                hash: String::new(),
                reason: e.to_string(),
            }),
        }
    }

    Ok((commits, warnings))
}

/// Outcome of analyzing a repository's history
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    /// Latest release tag, if any tag parsed
    pub previous: Option<VersionTag>,
    pub level: ReleaseLevel,
    pub next: SemanticVersion,
    /// Classified commits since the previous release, newest first
    pub commits: Vec<ConventionalCommit>,
    pub warnings: Vec<BoundaryWarning>,
}

impl ReleasePlan {
    /// Whether there is nothing worth releasing since the previous tag
    pub fn is_empty(&self) -> bool {
        self.previous.is_some() && self.level == ReleaseLevel::None
    }

    pub fn previous_version(&self) -> Option<&SemanticVersion> {
        self.previous.as_ref().map(|tag| &tag.version)
    }

    pub fn previous_tag(&self) -> Option<&str> {
        self.previous.as_ref().map(|tag| tag.name.as_str())
    }
}

/// Analyzes repository history to determine the next version
///
/// Projects without a release tag start at 1.0.0.
pub struct VersionAnalyzer {
    baseline: SemanticVersion,
    tag_pattern: TagPattern,
}

impl Default for VersionAnalyzer {
    fn default() -> Self {
        VersionAnalyzer {
            baseline: SemanticVersion::new(1, 0, 0),
            tag_pattern: TagPattern::default(),
        }
    }
}

impl VersionAnalyzer {
    /// Create an analyzer reading `v{version}` tags
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer reading tags named by `tag_pattern`
    pub fn with_tag_pattern(tag_pattern: TagPattern) -> Self {
        VersionAnalyzer {
            tag_pattern,
            ..Self::default()
        }
    }

    /// Next version after `previous` at the given level.
    ///
    /// Without a previous release the baseline is used as is.
    ///
    /// # Returns
    /// * `Err(ReleaseError::Parse)` - If the bumped component would overflow
    pub fn next_version(
        &self,
        previous: Option<&SemanticVersion>,
        level: ReleaseLevel,
    ) -> Result<SemanticVersion> {
        match previous {
            Some(version) => version.clone().bump(level),
            None => Ok(self.baseline.clone()),
        }
    }

    /// Read tags and commits from a repository and plan the next release
    #[instrument(skip_all, fields(pattern = %self.tag_pattern.pattern))]
    pub fn analyze_repository<R: Repository>(&self, repo: &R) -> Result<ReleasePlan> {
        let tags = repo.list_tags()?;
        debug!(count = tags.len(), "listed merged tags");

        let (versions, mut warnings) = collect_versions(&tags, &self.tag_pattern);
        let previous = versions.into_iter().next();

        let since = match &previous {
            Some(tag) => Some(repo.tag_target(&tag.name)?),
            None => {
                warnings.push(BoundaryWarning::NoPreviousRelease {
                    baseline: self.baseline.to_string(),
                });
                None
            }
        };

        let records = repo.commits_since(since.as_deref())?;
        debug!(count = records.len(), since = ?since, "read commits");

        let (commits, commit_warnings) = classify_commits(records)?;
        warnings.extend(commit_warnings);

        let level = resolve_level(&commits);
        let next = self.next_version(previous.as_ref().map(|tag| &tag.version), level)?;
        debug!(%level, %next, "resolved release");

        if let (Some(tag), ReleaseLevel::None) = (&previous, level) {
            warnings.push(BoundaryWarning::NoReleaseNeeded {
                latest_tag: tag.name.clone(),
            });
        }

        Ok(ReleasePlan {
            previous,
            level,
            next,
            commits,
            warnings,
        })
    }
}
