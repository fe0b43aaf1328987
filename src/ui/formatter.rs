//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from the
//! release workflow. Functions that build text are pure and testable; the
//! `display_*` wrappers only print.

use crate::boundary::BoundaryWarning;
use crate::domain::{CommitCategory, ConventionalCommit, GroupedCommits, ReleaseLevel, SemanticVersion};
use console::style;

const MAX_LISTED_COMMITS: usize = 10;
const MAX_SUBJECT_WIDTH: usize = 60;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

fn truncate(subject: &str) -> &str {
    match subject.char_indices().nth(MAX_SUBJECT_WIDTH) {
        Some((end, _)) => &subject[..end],
        None => subject,
    }
}

/// Lines listing up to ten commit subjects, newest first
pub fn format_commit_list(commits: &[ConventionalCommit]) -> Vec<String> {
    let mut lines: Vec<String> = commits
        .iter()
        .take(MAX_LISTED_COMMITS)
        .enumerate()
        .map(|(i, c)| format!("  {}. {} {}", i + 1, c.id.short, truncate(&c.subject)))
        .collect();

    if commits.len() > MAX_LISTED_COMMITS {
        lines.push(format!(
            "  ... and {} more commits",
            commits.len() - MAX_LISTED_COMMITS
        ));
    }
    lines
}

/// Display the commits that count towards the release.
pub fn display_commit_analysis(commits: &[ConventionalCommit], since: Option<&str>) {
    match since {
        Some(tag) => println!(
            "\n{}",
            style(format!("Commits since {}: {}", tag, commits.len())).bold()
        ),
        None => println!(
            "\n{}",
            style(format!("Commits in history: {}", commits.len())).bold()
        ),
    }
    for line in format_commit_list(commits) {
        println!("{}", line);
    }
}

/// Display the version change (or initial version).
pub fn display_proposed_version(
    previous: Option<&SemanticVersion>,
    next: &SemanticVersion,
    level: ReleaseLevel,
) {
    match previous {
        Some(old) => {
            println!("\n{}", style(format!("Proposed Release ({}):", level)).bold());
            println!("  From: {}", style(old).red());
            println!("  To:   {}", style(next).green());
        }
        None => {
            println!("\n{}", style("Initial Release:").bold());
            println!("  Version: {}", style(next).green());
        }
    }
}

/// One line per category with the number of commits in it
pub fn format_category_summary(grouped: &GroupedCommits<'_>) -> Vec<String> {
    CommitCategory::ALL
        .iter()
        .filter_map(|category| {
            grouped
                .get(category)
                .map(|commits| format!("  {}: {}", category.title(), commits.len()))
        })
        .collect()
}

/// Display what a release would do without doing it.
pub fn display_dry_run(tag: &str, summary: &[String], changelog_section: &str, manifest: &str) {
    println!("\n{}", style("Dry run, nothing written").bold());
    println!("  Tag:      {}", style(tag).cyan());
    println!("  Manifest: {}", manifest);
    for line in summary {
        println!("{}", line);
    }
    println!("\n{}", changelog_section.trim_end());
}
