//! Analysis engine for determining the next release from history

pub mod version_analyzer;

pub use version_analyzer::{
    classify_commits, collect_versions, resolve_level, ReleasePlan, VersionAnalyzer, VersionTag,
};
