//! Git repository inspection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::{ErrorCode, Repository};
use tracing::debug;

pub mod hooks;

pub use hooks::{HookInstaller, InstallOutcome, UninstallOutcome, HOOK_NAME};

/// Source of the branch the commit is being made on.
pub trait BranchNameReader {
    /// Returns the current branch name, or an empty string when `HEAD` is detached.
    fn current_branch(&self) -> Result<String>;
}

/// Reads the current branch of the repository containing a directory.
pub struct GitBranchNameReader {
    start_dir: PathBuf,
}

impl GitBranchNameReader {
    /// Creates a reader that discovers the repository from `start_dir` upwards.
    pub fn new(start_dir: impl Into<PathBuf>) -> Self {
        Self {
            start_dir: start_dir.into(),
        }
    }
}

impl BranchNameReader for GitBranchNameReader {
    fn current_branch(&self) -> Result<String> {
        let repo = Repository::discover(&self.start_dir).with_context(|| {
            format!("Not in a git repository: {}", self.start_dir.display())
        })?;
        branch_name(&repo)
    }
}

/// Returns the branch `HEAD` points to.
///
/// Works on unborn branches (no commits yet) by reading the symbolic target
/// of `HEAD`. A detached `HEAD` yields an empty name.
pub fn branch_name(repo: &Repository) -> Result<String> {
    match repo.head() {
        Ok(head) if head.is_branch() => Ok(head.shorthand().unwrap_or_default().to_string()),
        Ok(_) => {
            debug!("HEAD is detached");
            Ok(String::new())
        }
        Err(e) if e.code() == ErrorCode::UnbornBranch => {
            let head = repo
                .find_reference("HEAD")
                .context("Failed to read HEAD reference")?;
            let target = head.symbolic_target().unwrap_or_default();
            debug!(head_target = target, "HEAD points to an unborn branch");
            Ok(target
                .strip_prefix("refs/heads/")
                .unwrap_or(target)
                .to_string())
        }
        Err(e) => Err(e).context("Failed to get HEAD reference"),
    }
}

/// Returns the `.git` directory of the repository containing `dir`.
///
/// For a linked worktree this is the main repository's `.git` directory.
pub fn discover_git_dir(dir: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(dir)
        .with_context(|| format!("Not in a git repository: {}", dir.display()))?;
    Ok(repo.commondir().to_path_buf())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use git2::Signature;

    fn commit_empty_tree(repo: &Repository) -> Result<git2::Oid> {
        let signature = Signature::now("Test User", "test@example.com")?;
        let tree_id = repo.index()?.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        Ok(repo.commit(Some("HEAD"), &signature, &signature, "init", &tree, &[])?)
    }

    #[test]
    fn reads_unborn_branch() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let repo = Repository::init(dir.path())?;
        repo.set_head("refs/heads/feature/ABC-1")?;

        let reader = GitBranchNameReader::new(dir.path());
        assert_eq!(reader.current_branch()?, "feature/ABC-1");
        Ok(())
    }

    #[test]
    fn reads_branch_after_commit() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let repo = Repository::init(dir.path())?;
        let oid = commit_empty_tree(&repo)?;
        let commit = repo.find_commit(oid)?;
        repo.branch("release/v1.0", &commit, false)?;
        repo.set_head("refs/heads/release/v1.0")?;

        assert_eq!(branch_name(&repo)?, "release/v1.0");
        Ok(())
    }

    #[test]
    fn detached_head_is_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let repo = Repository::init(dir.path())?;
        let oid = commit_empty_tree(&repo)?;
        repo.set_head_detached(oid)?;

        assert_eq!(branch_name(&repo)?, "");
        Ok(())
    }

    #[test]
    fn discovers_from_git_dir() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let repo = Repository::init(dir.path())?;
        repo.set_head("refs/heads/PROJECT-7")?;

        let reader = GitBranchNameReader::new(repo.path());
        assert_eq!(reader.current_branch()?, "PROJECT-7");
        assert_eq!(
            discover_git_dir(dir.path())?.canonicalize()?,
            repo.path().canonicalize()?
        );
        Ok(())
    }

    #[test]
    fn outside_repository_fails() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let reader = GitBranchNameReader::new(dir.path());
        let err = reader.current_branch().unwrap_err();
        assert!(err.to_string().contains("Not in a git repository"));
        Ok(())
    }
}
