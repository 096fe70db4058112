//! Commit message validation.

use tracing::debug;

use super::matcher::PatternMatcher;
use crate::config::{ProjectConfig, ValidationRules, WILDCARD};
use crate::error::HookError;

/// Checks rendered commit messages against the rules configured for the branch type.
pub struct MessageValidator<'a> {
    project: &'a ProjectConfig,
    matcher: &'a dyn PatternMatcher,
}

impl<'a> MessageValidator<'a> {
    /// Creates a validator for `project`.
    pub fn new(project: &'a ProjectConfig, matcher: &'a dyn PatternMatcher) -> Self {
        Self { project, matcher }
    }

    /// Returns the rules for `branch_type`, falling back to the wildcard entry.
    ///
    /// An exact entry wins even when it is empty.
    pub fn select_rules(&self, branch_type: Option<&str>) -> Option<&'a ValidationRules> {
        let validation = &self.project.validation;
        branch_type
            .and_then(|t| validation.get(t))
            .or_else(|| validation.get(WILDCARD))
    }

    /// Validates `commit_message` for `branch_name`, a branch of `branch_type`.
    ///
    /// Passes when no rules apply or when at least one rule matches.
    pub fn validate(
        &self,
        branch_type: Option<&str>,
        branch_name: &str,
        commit_message: &str,
    ) -> Result<(), HookError> {
        let rules = match self.select_rules(branch_type) {
            Some(rules) if !rules.is_empty() => rules,
            _ => {
                debug!(branch_type = ?branch_type, "No validation rules apply");
                return Ok(());
            }
        };

        for pattern in rules.keys() {
            if self.matcher.is_match(pattern, commit_message)? {
                debug!(branch_type = ?branch_type, pattern = %pattern, "Commit message accepted");
                return Ok(());
            }
        }

        Err(HookError::Validation {
            branch_name: branch_name.to_string(),
            descriptions: rules.values().cloned().collect(),
        })
    }
}
