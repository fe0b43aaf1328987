//! Main workflow orchestration logic
//!
//! This module contains the release workflow behind the binary. It keeps
//! CLI argument parsing apart from the business logic so the workflow can be
//! driven programmatically against any [`Repository`].

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::analyzer::VersionAnalyzer;
use crate::boundary::BoundaryWarning;
use crate::changelog::{render_section, ChangelogWriter};
use crate::config::Config;
use crate::domain::{group_by_category, ReleaseLevel, SemanticVersion};
use crate::git::{ReleaseCommit, Repository};
use crate::manifest::{Manifest, ProjectType};
use crate::ui;

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// Options left as `None` fall back to the configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseWorkflowArgs {
    /// Changelog path; relative paths resolve against the repository root
    pub changelog_path: Option<String>,

    /// Project type deciding which manifest is patched
    pub project_type: Option<String>,

    /// Preview mode - don't write files or create the release
    pub dry_run: bool,

    /// Release the unchanged version when no commit warrants a bump
    pub allow_empty: bool,
}

/// How the workflow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    /// Changelog, manifest, commit and tag were written
    Released,
    /// The release was computed and shown only
    DryRun,
    /// No commit since the latest tag warrants a release
    NothingToRelease,
}

/// Result of a successful release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub status: WorkflowStatus,
    pub previous: Option<SemanticVersion>,
    pub version: SemanticVersion,
    pub level: ReleaseLevel,
    pub tag: String,
    pub changelog: PathBuf,
    pub manifest: PathBuf,
    pub warnings: Vec<BoundaryWarning>,
}

fn resolve_changelog(root: &Path, changelog: &str) -> PathBuf {
    let path = Path::new(changelog);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Main release workflow
///
/// Orchestrates the entire release:
/// 1. Resolve project type and locate its manifest
/// 2. Analyze tags and commits to plan the next version
/// 3. Stop when there is nothing to release, or on dry run
/// 4. Write the changelog and patch the manifest
/// 5. Create the release commit and tag
///
/// # Arguments
///
/// * `repo` - Repository history provider
/// * `args` - Workflow arguments (overrides for config values)
/// * `config` - Loaded configuration
/// * `today` - Date written into the changelog section
///
/// # Returns
///
/// Result describing what was released, or error
pub fn run_release_workflow<R: Repository>(
    repo: &R,
    args: &ReleaseWorkflowArgs,
    config: &Config,
    today: NaiveDate,
) -> Result<WorkflowResult> {
    let project_type: ProjectType = args
        .project_type
        .as_deref()
        .unwrap_or(&config.project_type)
        .parse()?;
    let tag_pattern = config.release.tag_pattern()?;
    let commit_pattern = config.release.commit_pattern()?;
    let allow_empty = args.allow_empty || config.behavior.allow_empty_release;

    let root = repo.root().context("Failed to find repository root")?;
    let manifest = Manifest::locate(&root, project_type)?;
    let changelog = resolve_changelog(
        &root,
        args.changelog_path.as_deref().unwrap_or(&config.changelog),
    );
    info!(root = %root.display(), %project_type, "starting release");

    let plan = VersionAnalyzer::with_tag_pattern(tag_pattern.clone())
        .analyze_repository(repo)
        .context("Failed to analyze repository history")?;

    for warning in &plan.warnings {
        if allow_empty && matches!(warning, BoundaryWarning::NoReleaseNeeded { .. }) {
            continue;
        }
        ui::display_boundary_warning(warning);
    }

    let tag = tag_pattern.format(&plan.next);
    let mut result = WorkflowResult {
        status: WorkflowStatus::NothingToRelease,
        previous: plan.previous_version().cloned(),
        version: plan.next.clone(),
        level: plan.level,
        tag: tag.clone(),
        changelog: changelog.clone(),
        manifest: manifest.path.clone(),
        warnings: plan.warnings.clone(),
    };

    if plan.is_empty() && !allow_empty {
        info!("nothing to release");
        return Ok(result);
    }

    ui::display_commit_analysis(&plan.commits, plan.previous_tag());
    ui::display_proposed_version(plan.previous_version(), &plan.next, plan.level);

    if repo.tag_target(&tag).is_ok() {
        bail!("Tag '{}' already exists", tag);
    }

    let grouped = group_by_category(&plan.commits);
    let section = render_section(&plan.next, today, &grouped);

    if args.dry_run {
        ui::display_dry_run(
            &tag,
            &ui::format_category_summary(&grouped),
            &section,
            &manifest.path.display().to_string(),
        );
        result.status = WorkflowStatus::DryRun;
        return Ok(result);
    }

    ChangelogWriter::new(&changelog)
        .write(&section)
        .context("Failed to update changelog")?;
    ui::display_status(&format!("Updated {}", changelog.display()));

    manifest
        .patch(&plan.next)
        .context("Failed to update manifest")?;
    ui::display_status(&format!("Updated {}", manifest.path.display()));

    repo.create_release(&ReleaseCommit {
        message: commit_pattern.format(&plan.next),
        tag: tag.clone(),
        author_name: config.release.author_name.clone(),
        author_email: config.release.author_email.clone(),
    })
    .context("Failed to create release commit")?;

    ui::display_success(&format!("Released {}", tag));
    result.status = WorkflowStatus::Released;
    Ok(result)
}
