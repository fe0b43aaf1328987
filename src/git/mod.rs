//! Repository history provider
//!
//! This module provides a trait-based abstraction over the git operations a
//! release needs, allowing a real repository and an in-memory mock to be used
//! interchangeably.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! Most code should depend on the [Repository] trait rather than concrete
//! implementations.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::RawCommit;
use crate::error::Result;
use std::path::PathBuf;

/// Everything needed to record a release in the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCommit {
    /// Message of the release commit (e.g. "chore(release): v1.2.0")
    pub message: String,
    /// Name of the annotated tag; also used as the tag message
    pub tag: String,
    /// Identity recorded as author and committer of both commit and tag
    pub author_name: String,
    pub author_email: String,
}

/// Common git operation trait for abstraction
///
/// ## Error Handling
///
/// Methods return [crate::error::Result<T>]. Failures to read or write
/// repository state are fatal to a release. Individual commit records that
/// cannot be decoded are reported inside the batch returned by
/// [Repository::commits_since] so the caller can skip them.
pub trait Repository {
    /// Root directory of the working tree
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Absolute path of the working tree root
    /// * `Err` - If the repository has no working tree
    fn root(&self) -> Result<PathBuf>;

    /// Names of all tags reachable from HEAD
    ///
    /// Tags on commits that HEAD does not contain are left out, matching
    /// `git tag --merged`. Order is unspecified.
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Long hash of the commit a tag points to
    ///
    /// Handles both lightweight and annotated tags.
    ///
    /// # Arguments
    /// * `tag` - Name of the tag (e.g., "v1.0.0")
    ///
    /// # Returns
    /// * `Ok(String)` - Full hash of the tagged commit
    /// * `Err` - If the tag does not exist or does not point at a commit
    fn tag_target(&self, tag: &str) -> Result<String>;

    /// Commits reachable from HEAD but not from `since`, newest first
    ///
    /// With `since == None` the whole history of HEAD is returned. An unborn
    /// HEAD yields an empty list.
    ///
    /// # Arguments
    /// * `since` - Long hash of the last released commit (exclusive)
    ///
    /// # Returns
    /// * `Ok(Vec<Result<RawCommit>>)` - One entry per commit; entries that could
    ///   not be decoded carry a [crate::error::ReleaseError::Decode]
    /// * `Err` - If history cannot be walked
    fn commits_since(&self, since: Option<&str>) -> Result<Vec<Result<RawCommit>>>;

    /// Stage all working tree changes, commit them and tag the commit
    ///
    /// The commit is created even when nothing changed. The tag is annotated,
    /// with the tag name as its message.
    ///
    /// # Returns
    /// * `Ok(())` - Commit and tag were created
    /// * `Err` - If staging, committing or tagging fails (e.g. tag exists)
    fn create_release(&self, release: &ReleaseCommit) -> Result<()>;
}
