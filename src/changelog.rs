//! Changelog rendering and writing
//!
//! A release prepends one section under the document's level-one heading:
//!
//! ```text
//! # Changelog
//!
//! ## 1.2.0 - 2024-05-01
//!
//! ### Features
//! - **api:** add endpoint (abc1234)
//!
//! ### Bug Fixes
//! - handle empty input (def5678)
//!
//! ## 1.1.0 - 2024-04-02
//! ...
//! ```

use crate::domain::{CommitCategory, ConventionalCommit, GroupedCommits, SemanticVersion};
use crate::error::{ReleaseError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, instrument};

/// Heading written at the top of every changelog
pub const CHANGELOG_HEADING: &str = "# Changelog";

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# .*(?:\n|$)").expect("title regex is valid"));

fn render_entry(category: CommitCategory, commit: &ConventionalCommit) -> String {
    let mut entry = String::from("- ");
    if let Some(scope) = &commit.scope {
        entry.push_str(&format!("**{}:** ", scope));
    }
    if category.shows_type() {
        entry.push_str(&format!("{}: ", commit.r#type));
    }
    entry.push_str(&format!("{} ({})", commit.message, commit.id.short));
    entry
}

/// Render the section for one release.
///
/// Categories appear in fixed order and empty ones are left out. Without any
/// commit the section says `- No changes`.
pub fn render_section(
    version: &SemanticVersion,
    date: NaiveDate,
    grouped: &GroupedCommits<'_>,
) -> String {
    let mut section = format!("## {} - {}\n\n", version, date.format("%Y-%m-%d"));

    if grouped.values().all(Vec::is_empty) {
        section.push_str("- No changes\n");
        return section;
    }

    let blocks: Vec<String> = grouped
        .iter()
        .filter(|(_, commits)| !commits.is_empty())
        .map(|(category, commits)| {
            let mut block = format!("### {}\n", category.title());
            for commit in commits {
                block.push_str(&render_entry(*category, commit));
                block.push('\n');
            }
            block
        })
        .collect();

    section.push_str(&blocks.join("\n"));
    section
}

/// Everything of an existing changelog that follows its first level-one
/// heading, or the whole text when there is none.
pub fn previous_content(existing: &str) -> &str {
    match TITLE_REGEX.find(existing) {
        Some(title) => &existing[title.end()..],
        None => existing,
    }
}

/// Full changelog text with `section` placed above the previous releases.
///
/// Blank lines leading the previous content are dropped. Exactly one empty
/// line then separates it from the new section, whatever spacing the file
/// had under its heading.
pub fn compose(section: &str, existing: Option<&str>) -> String {
    let mut document = format!("{}\n\n{}", CHANGELOG_HEADING, section);
    let previous = existing.map(previous_content).unwrap_or_default();
    let previous = previous.trim_start_matches(['\n', '\r']);
    if !previous.is_empty() {
        document.push('\n');
        document.push_str(previous);
    }
    document
}

/// Writes release sections into a changelog file
pub struct ChangelogWriter {
    path: PathBuf,
}

impl ChangelogWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ChangelogWriter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file content; a missing file reads as `None`
    pub fn read_existing(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ReleaseError::changelog(format!(
                "Cannot read '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Text the file would contain after adding `section`
    pub fn preview(&self, section: &str) -> Result<String> {
        let existing = self.read_existing()?;
        Ok(compose(section, existing.as_deref()))
    }

    /// Prepend `section` to the changelog, creating the file if needed
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn write(&self, section: &str) -> Result<()> {
        let document = self.preview(section)?;
        fs::write(&self.path, document).map_err(|e| {
            ReleaseError::changelog(format!("Cannot write '{}': {}", self.path.display(), e))
        })?;
        debug!("changelog updated");
        Ok(())
    }
}
