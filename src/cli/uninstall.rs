//! Uninstall command.

use std::io::Write;

use anyhow::{bail, Result};
use clap::{ArgGroup, Parser};
use tracing::warn;

use super::install::select_projects;
use super::CommandContext;
use crate::git::{HookInstaller, UninstallOutcome, HOOK_NAME};

/// Uninstall command options.
#[derive(Parser)]
#[command(group(ArgGroup::new("target").required(true).args(["project", "all"])))]
pub struct UninstallCommand {
    /// Project to remove the hook from.
    #[arg(short, long, value_name = "PROJECT")]
    pub project: Option<String>,

    /// Removes the hook from every configured project.
    #[arg(short, long)]
    pub all: bool,
}

impl UninstallCommand {
    /// Executes the uninstall command.
    pub fn execute(self, ctx: &CommandContext, out: &mut dyn Write) -> Result<()> {
        let (_, configuration) = ctx.load_configuration()?;
        let installer = HookInstaller::new(&ctx.executable);

        let mut failures = 0;
        for (name, path) in select_projects(&configuration, self.project.as_deref())? {
            write!(
                out,
                "uninstalling git-commit-hook from '{}': ",
                HookInstaller::hook_path(path).display()
            )?;

            match installer.uninstall(path) {
                Ok(UninstallOutcome::Removed) => writeln!(out, "OK")?,
                Ok(UninstallOutcome::NotInstalled) => writeln!(out, "not installed")?,
                Ok(UninstallOutcome::ForeignHook) => {
                    writeln!(out, "another {HOOK_NAME} hook is installed, left in place")?;
                }
                Err(e) => {
                    warn!(project = name, error = %e, "Uninstall failed");
                    writeln!(out, "{e}")?;
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            bail!("done with errors");
        }
        Ok(())
    }
}
