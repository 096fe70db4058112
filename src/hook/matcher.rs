//! Regular expression matching for configured patterns.

use std::cell::RefCell;
use std::collections::HashMap;

use fancy_regex::Regex;

use crate::error::HookError;

/// Tests text against a pattern given as source.
pub trait PatternMatcher {
    /// Returns whether `pattern` finds a match anywhere in `text`.
    fn is_match(&self, pattern: &str, text: &str) -> Result<bool, HookError>;
}

/// [`PatternMatcher`] compiling each pattern once and caching it by source.
#[derive(Default)]
pub struct RegexCache {
    compiled: RefCell<HashMap<String, Regex>>,
}

impl RegexCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct patterns compiled so far.
    pub fn len(&self) -> usize {
        self.compiled.borrow().len()
    }

    /// Returns `true` if nothing has been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.compiled.borrow().is_empty()
    }
}

impl PatternMatcher for RegexCache {
    fn is_match(&self, pattern: &str, text: &str) -> Result<bool, HookError> {
        if let Some(regex) = self.compiled.borrow().get(pattern) {
            return search(regex, pattern, text);
        }

        let regex = Regex::new(pattern).map_err(|source| HookError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let matched = search(&regex, pattern, text);
        self.compiled
            .borrow_mut()
            .insert(pattern.to_string(), regex);
        matched
    }
}

fn search(regex: &Regex, pattern: &str, text: &str) -> Result<bool, HookError> {
    regex
        .is_match(text)
        .map_err(|source| HookError::PatternMatch {
            pattern: pattern.to_string(),
            source,
        })
}
