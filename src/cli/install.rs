//! Install command.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Result};
use clap::{ArgGroup, Parser};
use tracing::warn;

use super::CommandContext;
use crate::config::{ConfigError, Configuration};
use crate::git::{HookInstaller, InstallOutcome};

/// Install command options.
#[derive(Parser)]
#[command(group(ArgGroup::new("target").required(true).args(["project", "all"])))]
pub struct InstallCommand {
    /// Project to install the hook for.
    #[arg(short, long, value_name = "PROJECT")]
    pub project: Option<String>,

    /// Installs the hook for every configured project.
    #[arg(short, long)]
    pub all: bool,

    /// Replaces an existing commit-msg hook.
    #[arg(short, long)]
    pub force: bool,
}

impl InstallCommand {
    /// Executes the install command.
    pub fn execute(self, ctx: &CommandContext, out: &mut dyn Write) -> Result<()> {
        let (_, configuration) = ctx.load_configuration()?;
        let installer = HookInstaller::new(&ctx.executable);

        let targets = select_projects(&configuration, self.project.as_deref())?;
        let mut failures = 0;
        for (name, path) in targets {
            if !install_project(&installer, name, path, self.force, out)? {
                failures += 1;
            }
        }

        if failures > 0 {
            bail!("done with errors");
        }
        Ok(())
    }
}

/// Returns `(name, path)` of the selected project, or of all projects.
pub(crate) fn select_projects<'a>(
    configuration: &'a Configuration,
    project: Option<&str>,
) -> Result<Vec<(&'a str, &'a Path)>> {
    match project {
        Some(name) => {
            let (name, config) = configuration
                .projects
                .get_key_value(name)
                .ok_or_else(|| ConfigError::ProjectNotFoundByName(name.to_string()))?;
            Ok(vec![(name.as_str(), config.path.as_path())])
        }
        None => Ok(configuration
            .projects
            .iter()
            .map(|(name, config)| (name.as_str(), config.path.as_path()))
            .collect()),
    }
}

/// Installs into one project, reporting the outcome. Returns false on failure.
fn install_project(
    installer: &HookInstaller,
    name: &str,
    path: &Path,
    force: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    write!(
        out,
        "installing git-commit-hook to '{}': ",
        HookInstaller::hook_path(path).display()
    )?;

    match installer.install(path, force) {
        Ok(InstallOutcome::Installed) => writeln!(out, "OK")?,
        Ok(InstallOutcome::Replaced) => writeln!(out, "OK (replaced existing hook)")?,
        Ok(InstallOutcome::AlreadyInstalled) => writeln!(out, "already installed")?,
        Err(e) => {
            warn!(project = name, error = %e, "Install failed");
            writeln!(out, "{e}")?;
            return Ok(false);
        }
    }
    Ok(true)
}
