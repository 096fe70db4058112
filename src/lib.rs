//! # git-commit-hook
//!
//! A git `commit-msg` hook that rewrites and validates commit messages
//! depending on the type of the branch being committed to.
//!
//! Branch types are identified by regular expressions over the branch name.
//! Each type (or the `*` fallback) may carry a template producing the final
//! message and a set of rules the final message must satisfy.
//!
//! ## Example
//!
//! ```rust
//! use git_commit_hook::config::Configuration;
//! use git_commit_hook::hook::CommitMessageModifier;
//!
//! let configuration = Configuration::from_yaml_str(
//!     r#"
//! demo:
//!   path: /home/me/demo/.git
//!   branch:
//!     feature: '^feature/'
//!   template:
//!     feature: '{{.BranchName}}: {{.CommitMessage}}'
//! "#,
//! )
//! .unwrap();
//! let project = configuration.project_by_name("demo").unwrap();
//!
//! let modifier = CommitMessageModifier::new(project);
//! let message = modifier
//!     .modify_commit_message("initial commit\n", "feature/ABC-1")
//!     .unwrap();
//! assert_eq!(message, "feature/ABC-1: initial commit");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod hook;

pub use crate::cli::Cli;
pub use crate::error::HookError;

/// The current version of git-commit-hook.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
