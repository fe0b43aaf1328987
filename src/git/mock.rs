use crate::domain::{CommitId, RawCommit};
use crate::error::{ReleaseError, Result};
use crate::git::{ReleaseCommit, Repository};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory repository for testing without actual git operations
pub struct MockRepository {
    root: PathBuf,
    /// Newest first, like `git log`
    commits: Vec<Result<RawCommit>>,
    tags: HashMap<String, String>,
    tag_order: Vec<String>,
    releases: RefCell<Vec<ReleaseCommit>>,
}

impl MockRepository {
    /// Create an empty mock repository rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        MockRepository {
            root: root.into(),
            commits: Vec::new(),
            tags: HashMap::new(),
            tag_order: Vec::new(),
            releases: RefCell::new(Vec::new()),
        }
    }

    /// Record a new commit on top of history; returns its long hash
    pub fn add_commit(&mut self, subject: &str, body: &str) -> String {
        let long = format!("{:040x}", self.commits.len() + 1);
        let commit = RawCommit {
            id: CommitId {
                short: long[33..].to_string(),
                long: long.clone(),
            },
            subject: subject.to_string(),
            body: body.to_string(),
            ..RawCommit::default()
        };
        self.commits.insert(0, Ok(commit));
        long
    }

    /// Record a commit whose data cannot be decoded
    pub fn add_undecodable_commit(&mut self, reason: &str) -> String {
        let long = format!("{:040x}", self.commits.len() + 1);
        self.commits
            .insert(0, Err(ReleaseError::decode(long.clone(), reason)));
        long
    }

    /// Add a tag pointing to a commit hash
    pub fn add_tag(&mut self, name: impl Into<String>, commit: impl Into<String>) {
        let name = name.into();
        self.tag_order.push(name.clone());
        self.tags.insert(name, commit.into());
    }

    /// Releases created so far
    pub fn releases(&self) -> Vec<ReleaseCommit> {
        self.releases.borrow().clone()
    }

    fn hash_of(commit: &Result<RawCommit>) -> Option<&str> {
        match commit {
            Ok(raw) => Some(raw.id.long.as_str()),
            Err(ReleaseError::Decode { hash, .. }) => Some(hash.as_str()),
            Err(_) => None,
        }
    }

    fn copy(commit: &Result<RawCommit>) -> Result<RawCommit> {
        match commit {
            Ok(raw) => Ok(raw.clone()),
            Err(ReleaseError::Decode { hash, reason }) => Err(ReleaseError::decode(hash, reason)),
            Err(other) => Err(ReleaseError::repository(other.to_string())),
        }
    }
}

impl Repository for MockRepository {
    fn root(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tag_order.clone())
    }

    fn tag_target(&self, tag: &str) -> Result<String> {
        self.tags
            .get(tag)
            .cloned()
            .ok_or_else(|| ReleaseError::repository(format!("Cannot find tag '{}'", tag)))
    }

    fn commits_since(&self, since: Option<&str>) -> Result<Vec<Result<RawCommit>>> {
        Ok(self
            .commits
            .iter()
            .take_while(|c| since.is_none() || Self::hash_of(c) != since)
            .map(Self::copy)
            .collect())
    }

    fn create_release(&self, release: &ReleaseCommit) -> Result<()> {
        if self.tags.contains_key(&release.tag)
            || self.releases.borrow().iter().any(|r| r.tag == release.tag)
        {
            return Err(ReleaseError::repository(format!(
                "Cannot create tag '{}': tag already exists",
                release.tag
            )));
        }
        self.releases.borrow_mut().push(release.clone());
        Ok(())
    }
}
