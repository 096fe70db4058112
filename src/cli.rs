//! CLI interface for git-commit-hook.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, Configuration};

pub mod commit_msg;
pub mod diag;
pub mod install;
pub mod uninstall;

/// git-commit-hook: renders and validates commit messages per branch type.
///
/// Invoked by git as `commit-msg` hook with the path of the commit message
/// file. The subcommands manage and inspect the configuration.
#[derive(Parser)]
#[command(name = "git-commit-hook")]
#[command(about = "Renders and validates commit messages per branch type", long_about = None)]
#[command(version, args_conflicts_with_subcommands = true, arg_required_else_help = true)]
pub struct Cli {
    /// Configuration file to use instead of searching for one.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Commit message file, as passed by git to the commit-msg hook.
    #[arg(value_name = "COMMIT_MSG_FILE")]
    pub commit_message_file: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Installs the hook into configured repositories.
    Install(install::InstallCommand),
    /// Removes the hook from configured repositories.
    Uninstall(uninstall::UninstallCommand),
    /// Shows the message a commit would get, without committing.
    Test(test::TestCommand),
    /// Prints the configuration and the installation state of every project.
    Diag(diag::DiagCommand),
}

/// Environment a command runs in.
pub struct CommandContext {
    /// Explicit configuration file (`--config`).
    pub config_override: Option<PathBuf>,
    /// Directory the command was started from.
    pub working_dir: PathBuf,
    /// Executable installed as the hook.
    pub executable: PathBuf,
}

impl CommandContext {
    /// Captures the current directory and executable of this process.
    pub fn from_process(config_override: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            config_override,
            working_dir: std::env::current_dir().context("Failed to read current directory")?,
            executable: std::env::current_exe()
                .context("Failed to determine the running executable")?,
        })
    }

    /// Locates and loads the configuration file.
    pub fn load_configuration(&self) -> Result<(PathBuf, Configuration)> {
        Ok(config::load_configuration(
            self.config_override.as_deref(),
            &self.working_dir,
        )?)
    }

    /// Resolves `path` against the working directory.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

impl Cli {
    /// Executes the CLI command against this process's environment and stdout.
    pub fn execute(self) -> Result<()> {
        let ctx = CommandContext::from_process(self.config.clone())?;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.execute_in(&ctx, &mut out)
    }

    /// Executes the CLI command in `ctx`, writing command output to `out`.
    pub fn execute_in(self, ctx: &CommandContext, out: &mut dyn Write) -> Result<()> {
        match (self.command, self.commit_message_file) {
            (Some(Commands::Install(cmd)), _) => cmd.execute(ctx, out),
            (Some(Commands::Uninstall(cmd)), _) => cmd.execute(ctx, out),
            (Some(Commands::Test(cmd)), _) => cmd.execute(ctx, out),
            (Some(Commands::Diag(cmd)), _) => cmd.execute(ctx, out),
            (None, Some(file)) => commit_msg::run(&file, ctx),
            (None, None) => bail!("No commit message file given, see --help"),
        }
    }
}
