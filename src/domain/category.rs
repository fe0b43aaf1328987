//! Changelog categories for classified commits
//!
//! A commit lands in exactly one category. Categories are decided by an
//! ordered rule table, first match wins.

use crate::domain::ConventionalCommit;
use std::collections::BTreeMap;
use std::fmt;

/// Changelog category, in rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommitCategory {
    Breaking,
    Feature,
    Fix,
    Miscellaneous,
}

impl CommitCategory {
    /// Every category, in rendering order
    pub const ALL: [CommitCategory; 4] = [
        CommitCategory::Breaking,
        CommitCategory::Feature,
        CommitCategory::Fix,
        CommitCategory::Miscellaneous,
    ];

    /// Section heading used in the changelog
    pub fn title(&self) -> &'static str {
        match self {
            CommitCategory::Breaking => "BREAKING CHANGES",
            CommitCategory::Feature => "Features",
            CommitCategory::Fix => "Bug Fixes",
            CommitCategory::Miscellaneous => "Miscellaneous",
        }
    }

    /// Categories that mix commit types show the type next to each entry
    pub fn shows_type(&self) -> bool {
        matches!(
            self,
            CommitCategory::Breaking | CommitCategory::Miscellaneous
        )
    }

    /// Category of a single commit according to [`CATEGORY_RULES`]
    pub fn of(commit: &ConventionalCommit) -> CommitCategory {
        CATEGORY_RULES
            .iter()
            .find(|rule| (rule.matches)(commit))
            .map(|rule| rule.category)
            .unwrap_or(CommitCategory::Miscellaneous)
    }
}

impl fmt::Display for CommitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Predicate deciding whether a commit belongs to a category
pub struct CategoryRule {
    pub category: CommitCategory,
    pub matches: fn(&ConventionalCommit) -> bool,
}

fn is_breaking(commit: &ConventionalCommit) -> bool {
    commit.is_breaking_change
}

fn is_feature(commit: &ConventionalCommit) -> bool {
    commit.is_feature()
}

fn is_fix(commit: &ConventionalCommit) -> bool {
    commit.is_fix()
}

fn any(_: &ConventionalCommit) -> bool {
    true
}

/// Evaluated top to bottom; the last rule catches everything.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: CommitCategory::Breaking,
        matches: is_breaking,
    },
    CategoryRule {
        category: CommitCategory::Feature,
        matches: is_feature,
    },
    CategoryRule {
        category: CommitCategory::Fix,
        matches: is_fix,
    },
    CategoryRule {
        category: CommitCategory::Miscellaneous,
        matches: any,
    },
];

/// Commits grouped by category; iteration follows rendering order and each
/// group keeps input order.
pub type GroupedCommits<'a> = BTreeMap<CommitCategory, Vec<&'a ConventionalCommit>>;

/// Group commits by category.
///
/// Categories without commits are absent from the map.
pub fn group_by_category(commits: &[ConventionalCommit]) -> GroupedCommits<'_> {
    let mut grouped = GroupedCommits::new();
    for commit in commits {
        grouped
            .entry(CommitCategory::of(commit))
            .or_default()
            .push(commit);
    }
    grouped
}
