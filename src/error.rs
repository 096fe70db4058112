//! Errors produced by the commit message pipeline.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned while turning a draft commit message into the final one.
#[derive(Error, Debug)]
pub enum HookError {
    /// The draft commit message was empty.
    #[error("commit message is empty")]
    EmptyCommitMessage,

    /// The current branch name could not be determined or is empty.
    #[error("branch name is empty")]
    EmptyBranchName,

    /// The selected template is malformed.
    #[error("template: commit message:{offset}: {reason}")]
    TemplateSyntax {
        /// Byte offset of the offending action in the template source.
        offset: usize,
        /// What is wrong with the action.
        reason: String,
    },

    /// The template engine failed while rendering a well-formed template.
    #[error("template: commit message: {0}")]
    TemplateRender(String),

    /// The rendered message matched none of the configured rules.
    #[error("{}", format_validation_failure(.branch_name, .descriptions))]
    Validation {
        /// Branch the commit was made on.
        branch_name: String,
        /// Descriptions of the rules, in rule pattern order.
        descriptions: Vec<String>,
    },

    /// A configured regular expression does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern source as written in the configuration.
        pattern: String,
        /// Compilation error from the regex engine.
        #[source]
        source: fancy_regex::Error,
    },

    /// Matching a pattern gave up, e.g. on the backtracking limit.
    #[error("failed to match pattern '{pattern}': {source}")]
    PatternMatch {
        /// Pattern source as written in the configuration.
        pattern: String,
        /// Error from the regex engine.
        #[source]
        source: fancy_regex::Error,
    },

    /// Configuration could not be loaded or resolved.
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

/// Formats the user-facing text of a validation failure.
fn format_validation_failure(branch_name: &str, descriptions: &[String]) -> String {
    let mut message = format!(
        "validation error for branch '{branch_name}'\nat least expected one of the following to match\n"
    );
    for description in descriptions {
        message.push_str(" - ");
        message.push_str(description);
        message.push('\n');
    }
    message
}
