//! Commit message rendering.

use serde::Serialize;
use tracing::debug;

use super::template::CommitMessageTemplate;
use crate::config::{ProjectConfig, WILDCARD};
use crate::error::HookError;

/// Values a commit message template can refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ViewModel {
    /// Current branch name.
    pub branch_name: String,
    /// Draft commit message, trimmed.
    pub commit_message: String,
}

impl ViewModel {
    /// Builds the view model, trimming surrounding blanks and line breaks from the message.
    pub fn new(commit_message: &str, branch_name: &str) -> Self {
        Self {
            branch_name: branch_name.to_string(),
            commit_message: commit_message
                .trim_matches([' ', '\t', '\r', '\n'])
                .to_string(),
        }
    }
}

/// Renders commit messages with the template configured for the branch type.
pub struct MessageRenderer<'a> {
    project: &'a ProjectConfig,
}

impl<'a> MessageRenderer<'a> {
    /// Creates a renderer for `project`.
    pub fn new(project: &'a ProjectConfig) -> Self {
        Self { project }
    }

    /// Returns the template for `branch_type`, falling back to the wildcard entry.
    pub fn select_template(&self, branch_type: Option<&str>) -> Option<&'a str> {
        let templates = &self.project.templates;
        branch_type
            .and_then(|t| templates.get(t))
            .or_else(|| templates.get(WILDCARD))
            .map(String::as_str)
    }

    /// Renders the commit message for `view_model` on a branch of `branch_type`.
    ///
    /// Without a matching template the view model's message is returned as is.
    pub fn render(
        &self,
        branch_type: Option<&str>,
        view_model: &ViewModel,
    ) -> Result<String, HookError> {
        let Some(source) = self.select_template(branch_type) else {
            debug!(branch_type = ?branch_type, "No template configured, keeping message");
            return Ok(view_model.commit_message.clone());
        };

        debug!(branch_type = ?branch_type, template = source, "Rendering commit message");
        CommitMessageTemplate::parse(source)?.render(view_model)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn project(templates: &[(&str, &str)]) -> ProjectConfig {
        ProjectConfig {
            templates: templates
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            ..ProjectConfig::default()
        }
    }

    #[test]
    fn view_model_trims_message() {
        let view_model = ViewModel::new("\n\r\n\t\tHELLO\n\tWORLD\t\r\n\r\t", "456");
        assert_eq!(
            view_model,
            ViewModel {
                branch_name: "456".to_string(),
                commit_message: "HELLO\n\tWORLD".to_string(),
            }
        );
    }

    #[test]
    fn renders_template_of_branch_type() {
        let cfg = project(&[("feature", "{{.BranchName}}: {{.CommitMessage}}")]);
        let renderer = MessageRenderer::new(&cfg);

        let rendered = renderer
            .render(
                Some("feature"),
                &ViewModel::new("initial commit", "feature/PRJ_TEST-1242"),
            )
            .unwrap();
        assert_eq!(rendered, "feature/PRJ_TEST-1242: initial commit");
    }

    #[test]
    fn select_template_prefers_exact_over_wildcard() {
        let cfg = project(&[
            ("branch1", "templ1"),
            ("branch2", "templ2"),
            (WILDCARD, "fallback"),
            ("branch4", "templ4"),
        ]);
        let renderer = MessageRenderer::new(&cfg);

        assert_eq!(renderer.select_template(Some("branch2")), Some("templ2"));
        assert_eq!(renderer.select_template(Some("branch4")), Some("templ4"));
        assert_eq!(renderer.select_template(Some("branch0")), Some("fallback"));
        assert_eq!(renderer.select_template(None), Some("fallback"));
    }

    #[test]
    fn wildcard_renders_untyped_branch() {
        let cfg = project(&[(WILDCARD, "[{{.BranchName}}] {{.CommitMessage}}")]);
        let renderer = MessageRenderer::new(&cfg);

        let rendered = renderer
            .render(None, &ViewModel::new("tidy up", "chore-42"))
            .unwrap();
        assert_eq!(rendered, "[chore-42] tidy up");
    }

    #[test]
    fn missing_template_keeps_message() {
        let cfg = project(&[("release", "{{.BranchName}}: {{.CommitMessage}}")]);
        let renderer = MessageRenderer::new(&cfg);

        let rendered = renderer
            .render(
                Some("feature"),
                &ViewModel::new("some commit message", "feature/x"),
            )
            .unwrap();
        assert_eq!(rendered, "some commit message");
    }

    #[test]
    fn no_configuration_keeps_message() {
        let cfg = ProjectConfig::default();
        let renderer = MessageRenderer::new(&cfg);

        let rendered = renderer
            .render(None, &ViewModel::new("some commit message", "feature"))
            .unwrap();
        assert_eq!(rendered, "some commit message");
    }

    #[test]
    fn invalid_template_is_a_syntax_error() {
        let cfg = project(&[("feature", "{{{{{ HELLO")]);
        let renderer = MessageRenderer::new(&cfg);

        let err = renderer
            .render(Some("feature"), &ViewModel::new("msg", "feature/x"))
            .unwrap_err();
        assert!(matches!(err, HookError::TemplateSyntax { .. }));
        assert!(err.to_string().contains("template:"));
    }
}
