//! Configuration model: projects, branch types, templates and validation rules.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod discovery;

pub use discovery::{
    find_configuration_file, load_configuration, load_configuration_from, CONFIG_ENV_VAR,
    CONFIG_FILE_NAME,
};

/// Key of the fallback entry in the template and validation maps.
pub const WILDCARD: &str = "*";

/// Rule set for one branch type: regex pattern → human-readable description.
pub type ValidationRules = BTreeMap<String, String>;

/// Errors raised while locating, parsing or resolving the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No configuration file exists at any known location.
    #[error("configuration file '{file_name}' not found, searched: {}", format_searched(.searched))]
    NotFound {
        /// File name that was searched for.
        file_name: String,
        /// Every location that was tried, in order.
        searched: Vec<PathBuf>,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file '{}'", .path.display())]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected shape.
    #[error("failed to parse configuration file '{}'", .path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// No project is configured for the repository.
    #[error("project configuration not found for path '{}'", .0.display())]
    ProjectNotFoundForPath(PathBuf),

    /// More than one project is configured for the repository.
    #[error("more than one project configured for path '{}': {}", .path.display(), .projects.join(", "))]
    AmbiguousProject {
        /// Repository path that was looked up.
        path: PathBuf,
        /// Names of all matching projects.
        projects: Vec<String>,
    },

    /// No project with the given name exists.
    #[error("project configuration not found for project name '{0}'")]
    ProjectNotFoundByName(String),

    /// A project contains a pattern that does not compile.
    #[error("project '{project}' has an invalid pattern '{pattern}'")]
    InvalidPattern {
        /// Project that holds the pattern.
        project: String,
        /// Pattern source.
        pattern: String,
        /// Compilation error from the regex engine.
        #[source]
        source: fancy_regex::Error,
    },
}

fn format_searched(searched: &[PathBuf]) -> String {
    searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The whole configuration file: project name → project configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    /// Projects keyed by name.
    pub projects: BTreeMap<String, ProjectConfig>,
}

/// Configuration of a single repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Path to the repository's `.git` directory.
    #[serde(default)]
    pub path: PathBuf,

    /// Branch type → pattern identifying branch names of that type.
    #[serde(default, rename = "branch")]
    pub branch_types: BTreeMap<String, String>,

    /// Branch type (or `*`) → template rendering the commit message.
    #[serde(default, rename = "template")]
    pub templates: BTreeMap<String, String>,

    /// Branch type (or `*`) → rules the rendered message must satisfy.
    #[serde(default)]
    pub validation: BTreeMap<String, ValidationRules>,
}

impl Configuration {
    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Returns the single project configured for the given repository path.
    ///
    /// A project matches when its `path` equals `repo_path`, or, when
    /// `repo_path` is a `.git` directory, its parent working tree.
    pub fn project_by_repo_path(
        &self,
        repo_path: &Path,
    ) -> Result<(&str, &ProjectConfig), ConfigError> {
        let wanted = normalize(repo_path);
        let worktree = if wanted.file_name() == Some(OsStr::new(".git")) {
            wanted.parent().map(Path::to_path_buf)
        } else {
            None
        };

        let matches: Vec<(&str, &ProjectConfig)> = self
            .projects
            .iter()
            .filter(|(_, project)| {
                let configured = normalize(&project.path);
                !configured.as_os_str().is_empty()
                    && (configured == wanted || Some(&configured) == worktree.as_ref())
            })
            .map(|(name, project)| (name.as_str(), project))
            .collect();

        match matches.as_slice() {
            [] => Err(ConfigError::ProjectNotFoundForPath(repo_path.to_path_buf())),
            [single] => Ok(*single),
            many => Err(ConfigError::AmbiguousProject {
                path: repo_path.to_path_buf(),
                projects: many.iter().map(|(name, _)| (*name).to_string()).collect(),
            }),
        }
    }

    /// Returns the project with the given name.
    pub fn project_by_name(&self, name: &str) -> Result<&ProjectConfig, ConfigError> {
        self.projects
            .get(name)
            .ok_or_else(|| ConfigError::ProjectNotFoundByName(name.to_string()))
    }

    /// Compiles every pattern of every project, failing on the first invalid one.
    pub fn check_patterns(&self) -> Result<(), ConfigError> {
        for (name, project) in &self.projects {
            project
                .check_patterns()
                .map_err(|(pattern, source)| ConfigError::InvalidPattern {
                    project: name.clone(),
                    pattern,
                    source,
                })?;
        }
        Ok(())
    }
}

impl ProjectConfig {
    /// Iterates over every regex source in this project: branch type
    /// matchers first, then validation rules.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.branch_types
            .values()
            .chain(self.validation.values().flat_map(BTreeMap::keys))
            .map(String::as_str)
    }

    fn check_patterns(&self) -> Result<(), (String, fancy_regex::Error)> {
        for pattern in self.patterns() {
            Regex::new(pattern).map_err(|e| (pattern.to_string(), e))?;
        }
        Ok(())
    }
}

/// Strips trailing separators and `.` components so equal paths compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}
