//! Branch type classification.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::matcher::PatternMatcher;
use crate::error::HookError;

/// Maps branch names to configured branch types.
pub struct BranchTypeClassifier<'a> {
    branch_types: &'a BTreeMap<String, String>,
    matcher: &'a dyn PatternMatcher,
}

impl<'a> BranchTypeClassifier<'a> {
    /// Creates a classifier over `branch type → pattern`.
    pub fn new(branch_types: &'a BTreeMap<String, String>, matcher: &'a dyn PatternMatcher) -> Self {
        Self {
            branch_types,
            matcher,
        }
    }

    /// Returns every branch type whose pattern matches `branch_name`, in label order.
    pub fn matching_types(&self, branch_name: &str) -> Result<Vec<&'a str>, HookError> {
        let mut matching = Vec::new();
        for (branch_type, pattern) in self.branch_types {
            if self.matcher.is_match(pattern, branch_name)? {
                matching.push(branch_type.as_str());
            }
        }
        Ok(matching)
    }

    /// Returns the branch type of `branch_name`, or `None` for an untyped branch.
    ///
    /// Labels are tried in lexicographic order and the first match wins.
    /// Branch type patterns are expected to be mutually exclusive; a name
    /// matching several of them is logged.
    pub fn classify(&self, branch_name: &str) -> Result<Option<&'a str>, HookError> {
        let matching = self.matching_types(branch_name)?;

        if matching.len() > 1 {
            warn!(
                branch = branch_name,
                types = ?matching,
                "Branch matches several branch types, using '{}'",
                matching[0]
            );
        }

        let branch_type = matching.first().copied();
        debug!(branch = branch_name, branch_type = ?branch_type, "Classified branch");
        Ok(branch_type)
    }
}
