//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ConfigError, Configuration};

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "git-commit-hook.yaml";

/// Environment variable holding an explicit configuration file path.
pub const CONFIG_ENV_VAR: &str = "GIT_COMMIT_HOOK_CONFIG";

/// Returns the XDG-compliant config directory for git-commit-hook.
///
/// Uses `$XDG_CONFIG_HOME/git-commit-hook/` if the variable is set, otherwise
/// `$HOME/.config/git-commit-hook/`. `dirs::config_dir()` is avoided because
/// it points at `~/Library/Application Support/` on macOS.
fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_home.is_empty() {
            return Some(PathBuf::from(xdg_home).join("git-commit-hook"));
        }
    }

    dirs::home_dir().map(|home| home.join(".config").join("git-commit-hook"))
}

/// Lists the directories searched for the configuration file, in priority order.
///
/// 1. `{working_dir}`
/// 2. `{working_dir}/.git`
/// 3. `{working_dir}/.git/hooks`
/// 4. directory of the running executable
/// 5. `$XDG_CONFIG_HOME/git-commit-hook` (or `$HOME/.config/git-commit-hook`)
///
/// Git runs hooks through the `.git/hooks/commit-msg` symlink, so the
/// executable directory is the one the symlink points into.
pub fn search_directories(working_dir: &Path) -> Vec<PathBuf> {
    let mut dirs = vec![
        working_dir.to_path_buf(),
        working_dir.join(".git"),
        working_dir.join(".git").join("hooks"),
    ];

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    if let Some(config_dir) = xdg_config_dir() {
        dirs.push(config_dir);
    }

    dirs
}

/// Finds the configuration file.
///
/// An explicit `override_path` (the `--config` flag) wins, then a non-empty
/// [`CONFIG_ENV_VAR`], then the first existing file in
/// [`search_directories`].
pub fn find_configuration_file(
    override_path: Option<&Path>,
    working_dir: &Path,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = override_path {
        debug!(path = %path.display(), "Using configuration file from command line");
        return Ok(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if !env_path.is_empty() {
            debug!(path = %env_path, "Using configuration file from {CONFIG_ENV_VAR}");
            return Ok(PathBuf::from(env_path));
        }
    }

    let searched: Vec<PathBuf> = search_directories(working_dir)
        .into_iter()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .collect();

    for candidate in &searched {
        if candidate.is_file() {
            debug!(path = %candidate.display(), "Found configuration file");
            return Ok(candidate.clone());
        }
    }

    Err(ConfigError::NotFound {
        file_name: CONFIG_FILE_NAME.to_string(),
        searched,
    })
}

/// Reads, parses and checks the configuration file at `path`.
pub fn load_configuration_from(path: &Path) -> Result<Configuration, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let configuration =
        Configuration::from_yaml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    configuration.check_patterns()?;

    debug!(
        path = %path.display(),
        projects = configuration.projects.len(),
        "Loaded configuration"
    );
    Ok(configuration)
}

/// Finds and loads the configuration, returning the file it came from.
pub fn load_configuration(
    override_path: Option<&Path>,
    working_dir: &Path,
) -> Result<(PathBuf, Configuration), ConfigError> {
    let path = find_configuration_file(override_path, working_dir)?;
    let configuration = load_configuration_from(&path)?;
    Ok((path, configuration))
}
