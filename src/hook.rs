//! The commit message pipeline: classify the branch, render, validate.

pub mod classifier;
pub mod matcher;
pub mod renderer;
pub mod rewrite;
pub mod template;
pub mod validator;

pub use classifier::BranchTypeClassifier;
pub use matcher::{PatternMatcher, RegexCache};
pub use renderer::{MessageRenderer, ViewModel};
pub use rewrite::rewrite_commit_message_file;
pub use template::CommitMessageTemplate;
pub use validator::MessageValidator;

use tracing::debug;

use crate::config::ProjectConfig;
use crate::error::HookError;

/// Turns draft commit messages into final ones for one project.
pub struct CommitMessageModifier<'a> {
    project: &'a ProjectConfig,
    matcher: RegexCache,
}

impl<'a> CommitMessageModifier<'a> {
    /// Creates a modifier for `project`.
    pub fn new(project: &'a ProjectConfig) -> Self {
        Self {
            project,
            matcher: RegexCache::new(),
        }
    }

    /// Returns the branch type of `branch_name`, or `None` for an untyped branch.
    pub fn branch_type(&self, branch_name: &str) -> Result<Option<&str>, HookError> {
        BranchTypeClassifier::new(&self.project.branch_types, &self.matcher).classify(branch_name)
    }

    /// Renders and validates `commit_message` for `branch_name`.
    ///
    /// The branch is classified once and its type drives both template and
    /// rule selection. The message is trimmed before rendering. When validation fails the
    /// rendered message is dropped and only the error is returned.
    pub fn modify_commit_message(
        &self,
        commit_message: &str,
        branch_name: &str,
    ) -> Result<String, HookError> {
        if commit_message.is_empty() {
            return Err(HookError::EmptyCommitMessage);
        }
        if branch_name.is_empty() {
            return Err(HookError::EmptyBranchName);
        }

        let branch_type = self.branch_type(branch_name)?;
        let view_model = ViewModel::new(commit_message, branch_name);
        let rendered = MessageRenderer::new(self.project).render(branch_type, &view_model)?;
        MessageValidator::new(self.project, &self.matcher).validate(
            branch_type,
            branch_name,
            &rendered,
        )?;

        debug!(branch = branch_name, "Commit message accepted");
        Ok(rendered)
    }
}
