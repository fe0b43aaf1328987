use crate::domain::{CommitId, Committer, RawCommit};
use crate::error::{ReleaseError, Result};
use crate::git::ReleaseCommit;
use chrono::{DateTime, FixedOffset};
use git2::{ErrorCode, IndexAddOption, Mailmap, Oid, Repository as Git2Repo, Signature, Sort};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref()).map_err(|e| {
            ReleaseError::repository(format!(
                "Not in a git repository ({}): {}",
                path.as_ref().display(),
                e.message()
            ))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// HEAD commit, or `None` while the current branch has no commits
    fn head_oid(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn peel_tag(&self, tag: &str) -> Result<Oid> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{}", tag))
            .map_err(|e| ReleaseError::repository(format!("Cannot find tag '{}': {}", tag, e)))?;
        let commit = reference.peel_to_commit().map_err(|e| {
            ReleaseError::repository(format!("Tag '{}' does not point at a commit: {}", tag, e))
        })?;
        Ok(commit.id())
    }
}

impl super::Repository for Git2Repository {
    fn root(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseError::repository("Bare repositories have no working tree"))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let Some(head) = self.head_oid()? else {
            return Ok(Vec::new());
        };

        let names = self.repo.tag_names(None)?;
        let mut merged = Vec::new();

        for name in names.iter().flatten() {
            let target = match self.peel_tag(name) {
                Ok(target) => target,
                Err(e) => {
                    debug!(tag = name, error = %e, "skipping tag");
                    continue;
                }
            };
            if target == head || self.repo.graph_descendant_of(head, target)? {
                merged.push(name.to_string());
            } else {
                debug!(tag = name, "tag not reachable from HEAD");
            }
        }

        Ok(merged)
    }

    fn tag_target(&self, tag: &str) -> Result<String> {
        Ok(self.peel_tag(tag)?.to_string())
    }

    fn commits_since(&self, since: Option<&str>) -> Result<Vec<Result<RawCommit>>> {
        let Some(head) = self.head_oid()? else {
            return Ok(Vec::new());
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;

        if let Some(since) = since {
            let since = Oid::from_str(since).map_err(|e| {
                ReleaseError::repository(format!("Invalid commit hash '{}': {}", since, e))
            })?;
            revwalk.hide(since)?;
        }

        let mailmap = self.repo.mailmap()?;
        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(decode_commit(&commit, &mailmap));
        }

        Ok(commits)
    }

    fn create_release(&self, release: &ReleaseCommit) -> Result<()> {
        let mut index = self.repo.index()?;
        index.read(false)?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"], None)?;
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = Signature::now(&release.author_name, &release.author_email)?;

        let parent = match self.head_oid()? {
            Some(oid) => Some(self.repo.find_commit(oid)?),
            None => None,
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let commit_oid = self
            .repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                &release.message,
                &tree,
                &parents,
            )
            .map_err(|e| ReleaseError::repository(format!("Cannot create release commit: {}", e)))?;

        let object = self.repo.find_object(commit_oid, None)?;
        self.repo
            .tag(&release.tag, &object, &signature, &release.tag, false)
            .map_err(|e| {
                ReleaseError::repository(format!("Cannot create tag '{}': {}", release.tag, e))
            })?;

        debug!(commit = %commit_oid, tag = %release.tag, "release recorded");
        Ok(())
    }
}

/// Convert a git2 commit into a raw record, refusing anything that is not
/// valid UTF-8. The committer goes through the repository's `.mailmap`.
fn decode_commit(commit: &git2::Commit<'_>, mailmap: &Mailmap) -> Result<RawCommit> {
    let long = commit.id().to_string();
    let short = commit
        .as_object()
        .short_id()
        .ok()
        .and_then(|buf| buf.as_str().map(str::to_string))
        .unwrap_or_else(|| long.get(..7).unwrap_or(&long).to_string());

    let message = commit
        .message()
        .ok_or_else(|| ReleaseError::decode(&long, "message is not valid UTF-8"))?;
    let subject = commit.summary().unwrap_or(message).trim().to_string();
    let body = commit.body().unwrap_or_default().trim_end().to_string();

    let signature = commit
        .committer_with_mailmap(mailmap)
        .map_err(|e| {
            ReleaseError::decode(&long, format!("cannot map committer: {}", e.message()))
        })?;
    let name = signature
        .name()
        .ok_or_else(|| ReleaseError::decode(&long, "committer name is not valid UTF-8"))?
        .to_string();
    let email = signature
        .email()
        .ok_or_else(|| ReleaseError::decode(&long, "committer email is not valid UTF-8"))?
        .to_string();

    let when = signature.when();
    let offset = FixedOffset::east_opt(when.offset_minutes() * 60)
        .ok_or_else(|| ReleaseError::decode(&long, "invalid timezone offset"))?;
    let date = DateTime::from_timestamp(when.seconds(), 0)
        .ok_or_else(|| ReleaseError::decode(&long, "timestamp out of range"))?
        .with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S %z")
        .to_string();

    Ok(RawCommit {
        id: CommitId { short, long },
        committer: Committer { name, email },
        date,
        subject,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Git2Repo) {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        (dir, repo)
    }

    fn commit_file(repo: &Git2Repo, dir: &Path, file: &str, message: &str) -> Oid {
        fs::write(dir.join(file), message).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = repo.signature().unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[test]
    fn test_open_outside_repository_fails() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("not-a-repo");
        fs::create_dir(&nested).unwrap();
        // discovery may still find an enclosing repository on some machines,
        // so only assert the error shape when it fails
        if let Err(e) = Git2Repository::open(&nested) {
            assert!(e.to_string().contains("Not in a git repository"));
        }
    }

    #[test]
    fn test_unborn_head_is_empty() {
        let (_dir, repo) = init_repo();
        let repo = Git2Repository::from_git2(repo);

        assert!(repo.list_tags().unwrap().is_empty());
        assert!(repo.commits_since(None).unwrap().is_empty());
    }

    #[test]
    fn test_commits_since_tag_newest_first() {
        let (dir, repo) = init_repo();
        let first = commit_file(&repo, dir.path(), "a.txt", "chore: init");
        repo.tag_lightweight("v1.0.0", &repo.find_object(first, None).unwrap(), false)
            .unwrap();
        commit_file(&repo, dir.path(), "b.txt", "feat: second");
        commit_file(&repo, dir.path(), "c.txt", "fix: third\n\nwith a body");

        let repo = Git2Repository::from_git2(repo);
        let target = repo.tag_target("v1.0.0").unwrap();
        assert_eq!(target, first.to_string());

        let commits: Vec<RawCommit> = repo
            .commits_since(Some(&target))
            .unwrap()
            .into_iter()
            .map(|c| c.unwrap())
            .collect();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].subject, "fix: third");
        assert_eq!(commits[0].body, "with a body");
        assert_eq!(commits[1].subject, "feat: second");
        assert_eq!(commits[1].committer.name, "Test User");
        assert_eq!(commits[1].committer.email, "test@example.com");
        assert_eq!(commits[1].id.long.len(), 40);
        assert!(commits[1].id.long.starts_with(&commits[1].id.short));
    }

    #[test]
    fn test_committer_follows_mailmap() {
        let (dir, repo) = init_repo();
        fs::write(
            dir.path().join(".mailmap"),
            "Mapped Name <mapped@example.com> <test@example.com>\n",
        )
        .unwrap();
        commit_file(&repo, dir.path(), "a.txt", "feat: mapped");

        let repo = Git2Repository::from_git2(repo);
        let commits = repo.commits_since(None).unwrap();
        let commit = commits[0].as_ref().unwrap();

        assert_eq!(commit.committer.name, "Mapped Name");
        assert_eq!(commit.committer.email, "mapped@example.com");
    }

    #[test]
    fn test_list_tags_only_merged() {
        let (dir, repo) = init_repo();
        let base = commit_file(&repo, dir.path(), "a.txt", "chore: init");
        repo.tag_lightweight("v1.0.0", &repo.find_object(base, None).unwrap(), false)
            .unwrap();

        // a commit on a side branch that HEAD never sees
        let base_commit = repo.find_commit(base).unwrap();
        let sig = repo.signature().unwrap();
        let side = repo
            .commit(None, &sig, &sig, "feat: side", &base_commit.tree().unwrap(), &[&base_commit])
            .unwrap();
        repo.tag_lightweight("v9.0.0", &repo.find_object(side, None).unwrap(), false)
            .unwrap();
        drop(base_commit);

        let repo = Git2Repository::from_git2(repo);
        assert_eq!(repo.list_tags().unwrap(), vec!["v1.0.0".to_string()]);
    }

    #[test]
    fn test_create_release_commits_and_tags() {
        let (dir, repo) = init_repo();
        commit_file(&repo, dir.path(), "a.txt", "feat: init");
        fs::write(dir.path().join("CHANGELOG.md"), "# Changelog\n").unwrap();

        let wrapped = Git2Repository::from_git2(repo);
        wrapped
            .create_release(&ReleaseCommit {
                message: "chore(release): v1.0.0".to_string(),
                tag: "v1.0.0".to_string(),
                author_name: "release-lit-bot".to_string(),
                author_email: "bot@release-lit".to_string(),
            })
            .unwrap();

        let repo = Git2Repo::open(dir.path()).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.summary(), Some("chore(release): v1.0.0"));
        assert_eq!(head.author().name(), Some("release-lit-bot"));
        assert!(head.tree().unwrap().get_name("CHANGELOG.md").is_some());

        let tag = repo
            .find_reference("refs/tags/v1.0.0")
            .unwrap()
            .peel_to_tag()
            .unwrap();
        assert_eq!(tag.message().map(str::trim), Some("v1.0.0"));
        assert_eq!(tag.target_id(), head.id());
    }

    #[test]
    fn test_create_release_rejects_existing_tag() {
        let (dir, repo) = init_repo();
        let oid = commit_file(&repo, dir.path(), "a.txt", "feat: init");
        repo.tag_lightweight("v1.0.0", &repo.find_object(oid, None).unwrap(), false)
            .unwrap();

        let repo = Git2Repository::from_git2(repo);
        let err = repo
            .create_release(&ReleaseCommit {
                message: "chore(release): v1.0.0".to_string(),
                tag: "v1.0.0".to_string(),
                author_name: "bot".to_string(),
                author_email: "bot@example.com".to_string(),
            })
            .unwrap_err();
        assert!(err.to_string().contains("Cannot create tag 'v1.0.0'"));
    }
}
