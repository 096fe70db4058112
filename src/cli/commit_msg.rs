//! Hook mode: git passes the commit message file as the only argument.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::CommandContext;
use crate::git::{discover_git_dir, GitBranchNameReader};
use crate::hook::{rewrite_commit_message_file, CommitMessageModifier};

/// Rewrites the commit message file for the project of its repository.
pub fn run(commit_message_file: &Path, ctx: &CommandContext) -> Result<()> {
    let file = ctx.absolute(commit_message_file);
    let message_dir = file
        .parent()
        .with_context(|| format!("Invalid commit message file: {}", file.display()))?;

    // Worktrees keep their message file below the common git directory.
    let git_dir = discover_git_dir(message_dir).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to discover repository, using message file directory");
        message_dir.to_path_buf()
    });

    let (_, configuration) = ctx.load_configuration()?;
    let (project_name, project) = configuration.project_by_repo_path(&git_dir)?;
    debug!(project = project_name, git_dir = %git_dir.display(), "Running commit-msg hook");

    let modifier = CommitMessageModifier::new(project);
    let reader = GitBranchNameReader::new(message_dir);
    rewrite_commit_message_file(&file, &modifier, &reader)?;
    Ok(())
}
