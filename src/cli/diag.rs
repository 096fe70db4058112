//! Diag command: prints the configuration and where the hook is installed.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use super::CommandContext;
use crate::config::{Configuration, ValidationRules};
use crate::git::HookInstaller;

const SEPARATOR: &str = "-------------------------------------------------------------------";

/// Output format of the diag command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            other => Err(format!("unknown output format '{other}', expected text, json or yaml")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Diag command options.
#[derive(Parser)]
pub struct DiagCommand {
    /// Output format: text (default), json, yaml.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Everything the diag command reports.
#[derive(Debug, Serialize)]
pub struct Diagnostics {
    /// Configuration file that was loaded.
    pub configuration_file: PathBuf,
    /// One entry per project, sorted by name.
    pub projects: Vec<ProjectDiagnostics>,
}

/// Diagnostics of a single project.
#[derive(Debug, Serialize)]
pub struct ProjectDiagnostics {
    /// Project name.
    pub name: String,
    /// Configured repository path.
    pub path: PathBuf,
    /// Branch type → pattern.
    pub branch_types: BTreeMap<String, String>,
    /// Branch type → template.
    pub templates: BTreeMap<String, String>,
    /// Branch type → validation rules.
    pub validation: BTreeMap<String, ValidationRules>,
    /// Whether the hook points to this executable.
    pub hook_installed: bool,
    /// Whether a different commit-msg hook occupies the hook path.
    pub other_hook_installed: bool,
}

impl Diagnostics {
    /// Collects diagnostics for every project of `configuration`.
    pub fn collect(
        configuration_file: &Path,
        configuration: &Configuration,
        installer: &HookInstaller,
    ) -> Self {
        let projects = configuration
            .projects
            .iter()
            .map(|(name, project)| ProjectDiagnostics {
                name: name.clone(),
                path: project.path.clone(),
                branch_types: project.branch_types.clone(),
                templates: project.templates.clone(),
                validation: project.validation.clone(),
                hook_installed: installer.is_installed(&project.path),
                other_hook_installed: installer.is_other_hook_installed(&project.path),
            })
            .collect();

        Self {
            configuration_file: configuration_file.to_path_buf(),
            projects,
        }
    }

    fn write_text(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "git-commit-hook diagnostics")?;
        writeln!(out, "load configuration: {}", self.configuration_file.display())?;

        for project in &self.projects {
            writeln!(out)?;
            writeln!(out, "{SEPARATOR}")?;
            writeln!(out, "project: {}", project.name)?;
            writeln!(out, "path   : {}", project.path.display())?;

            writeln!(out, "\nbranch types:")?;
            for (branch_type, pattern) in &project.branch_types {
                writeln!(out, "\t{branch_type}: {pattern}")?;
            }

            writeln!(out, "\nbranch type templates:")?;
            for (branch_type, template) in &project.templates {
                writeln!(out, "\t{branch_type}: {template}")?;
            }

            writeln!(out, "\nbranch type validation:")?;
            for (branch_type, rules) in &project.validation {
                writeln!(out, "\t{branch_type}:")?;
                for (pattern, description) in rules {
                    writeln!(out, "\t\t{pattern}: {description}")?;
                }
            }

            let installed = if project.hook_installed {
                "YES"
            } else if project.other_hook_installed {
                "NO, another commit-msg hook is installed"
            } else {
                "NO"
            };
            writeln!(out, "\ngit-commit-hook installed: {installed}")?;
        }
        Ok(())
    }
}

impl DiagCommand {
    /// Executes the diag command.
    pub fn execute(self, ctx: &CommandContext, out: &mut dyn Write) -> Result<()> {
        let (config_path, configuration) = ctx.load_configuration()?;
        let installer = HookInstaller::new(&ctx.executable);
        let diagnostics = Diagnostics::collect(&config_path, &configuration, &installer);

        match self.format {
            OutputFormat::Text => diagnostics.write_text(out)?,
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&diagnostics)
                    .context("Failed to serialize diagnostics to JSON")?;
                writeln!(out, "{json}")?;
            }
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(&diagnostics)
                    .context("Failed to serialize diagnostics to YAML")?;
                write!(out, "{yaml}")?;
            }
        }
        Ok(())
    }
}
