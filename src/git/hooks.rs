//! Installation of the `commit-msg` hook as a symlink to this executable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

/// File name git looks up in the hooks directory.
pub const HOOK_NAME: &str = "commit-msg";

/// Result of [`HookInstaller::install`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The hook was created.
    Installed,
    /// An existing hook file was replaced.
    Replaced,
    /// The hook already pointed to this executable.
    AlreadyInstalled,
}

/// Result of [`HookInstaller::uninstall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// Our hook was removed.
    Removed,
    /// No hook was installed.
    NotInstalled,
    /// A hook that is not ours exists and was left in place.
    ForeignHook,
}

/// Manages the `commit-msg` hook of configured repositories.
pub struct HookInstaller {
    executable: PathBuf,
}

impl HookInstaller {
    /// Creates an installer linking hooks to `executable`.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Path of the hook for a project `path`, which is either a `.git`
    /// directory or a working tree containing one.
    pub fn hook_path(project_path: &Path) -> PathBuf {
        let git_dir = project_path.join(".git");
        let base = if git_dir.is_dir() {
            git_dir
        } else {
            project_path.to_path_buf()
        };
        base.join("hooks").join(HOOK_NAME)
    }

    /// True when the project's hook resolves to this executable.
    pub fn is_installed(&self, project_path: &Path) -> bool {
        let hook = Self::hook_path(project_path);
        match (fs::canonicalize(&hook), fs::canonicalize(&self.executable)) {
            (Ok(hook), Ok(executable)) => hook == executable,
            _ => false,
        }
    }

    /// True when some other file occupies the project's hook path.
    pub fn is_other_hook_installed(&self, project_path: &Path) -> bool {
        let hook = Self::hook_path(project_path);
        fs::symlink_metadata(hook).is_ok() && !self.is_installed(project_path)
    }

    /// Links the project's hook to this executable.
    ///
    /// An existing hook is only replaced when `force` is set.
    pub fn install(&self, project_path: &Path, force: bool) -> Result<InstallOutcome> {
        if !project_path.is_dir() {
            bail!("Repository path does not exist: {}", project_path.display());
        }

        let hook = Self::hook_path(project_path);
        if self.is_installed(project_path) {
            debug!(hook = %hook.display(), "Hook already installed");
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        let mut outcome = InstallOutcome::Installed;
        if fs::symlink_metadata(&hook).is_ok() {
            if !force {
                bail!(
                    "Another {HOOK_NAME} hook is installed at {}, use --force to replace it",
                    hook.display()
                );
            }
            fs::remove_file(&hook)
                .with_context(|| format!("Failed to remove existing hook {}", hook.display()))?;
            outcome = InstallOutcome::Replaced;
        }

        if let Some(hooks_dir) = hook.parent() {
            fs::create_dir_all(hooks_dir).with_context(|| {
                format!("Failed to create hooks directory {}", hooks_dir.display())
            })?;
        }

        create_symlink(&self.executable, &hook)
            .with_context(|| format!("Failed to create hook {}", hook.display()))?;
        info!(hook = %hook.display(), executable = %self.executable.display(), "Installed hook");
        Ok(outcome)
    }

    /// Removes the project's hook when it is ours.
    pub fn uninstall(&self, project_path: &Path) -> Result<UninstallOutcome> {
        let hook = Self::hook_path(project_path);

        if fs::symlink_metadata(&hook).is_err() {
            debug!(hook = %hook.display(), "No hook to remove");
            return Ok(UninstallOutcome::NotInstalled);
        }
        if !self.is_installed(project_path) {
            return Ok(UninstallOutcome::ForeignHook);
        }

        fs::remove_file(&hook)
            .with_context(|| format!("Failed to remove hook {}", hook.display()))?;
        info!(hook = %hook.display(), "Removed hook");
        Ok(UninstallOutcome::Removed)
    }
}

#[cfg(unix)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}
