//! Rewriting the commit message file handed over by git.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::CommitMessageModifier;
use crate::git::BranchNameReader;

/// Replaces the draft in `path` with the final commit message.
///
/// The file is left untouched when any step fails. An unreadable branch is
/// treated as an empty branch name.
pub fn rewrite_commit_message_file(
    path: &Path,
    modifier: &CommitMessageModifier<'_>,
    branch_reader: &dyn BranchNameReader,
) -> Result<String> {
    let draft = fs::read_to_string(path)
        .with_context(|| format!("Failed to read commit message file {}", path.display()))?;

    let branch_name = branch_reader.current_branch().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to read current branch");
        String::new()
    });

    let message = modifier.modify_commit_message(&draft, &branch_name)?;

    fs::write(path, &message)
        .with_context(|| format!("Failed to write commit message file {}", path.display()))?;
    debug!(path = %path.display(), "Rewrote commit message file");
    Ok(message)
}
