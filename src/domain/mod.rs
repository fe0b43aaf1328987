//! Domain logic - pure release rules independent of git operations

pub mod category;
pub mod commit;
pub mod release;
pub mod tag;
pub mod version;

pub use category::{group_by_category, CommitCategory, GroupedCommits};
pub use commit::{classify, Classification, CommitId, Committer, ConventionalCommit, RawCommit};
pub use release::ReleaseLevel;
pub use tag::TagPattern;
pub use version::SemanticVersion;
