//! Commit message templates.
//!
//! Templates use Go-style actions: `{{.BranchName}}` (or `{{BranchName}}`)
//! substitutes a field and `{{- ` / ` -}}` trim the whitespace next to an
//! action. Everything outside `{{ }}` is copied verbatim. A template is
//! checked and translated to handlebars syntax, then rendered by
//! `handlebars` in strict mode with HTML escaping disabled, so unknown fields
//! fail instead of rendering empty.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::HookError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Names handlebars reads as keywords or literals rather than fields.
const RESERVED: [&str; 6] = ["this", "else", "true", "false", "null", "undefined"];

/// A checked template, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessageTemplate {
    handlebars_source: String,
}

/// A single `{{ ... }}` action.
#[derive(Debug, PartialEq, Eq)]
struct Action<'a> {
    field: &'a str,
    trim_left: bool,
    trim_right: bool,
}

impl CommitMessageTemplate {
    /// Checks `source` and prepares it for rendering.
    pub fn parse(source: &str) -> Result<Self, HookError> {
        let mut handlebars_source = String::with_capacity(source.len());
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find(OPEN) {
            push_literal(&mut handlebars_source, &rest[..start]);

            let inner_start = start + OPEN.len();
            let Some(inner_len) = rest[inner_start..].find(CLOSE) else {
                return Err(syntax_error(offset + start, "unclosed action"));
            };

            let inner = &rest[inner_start..inner_start + inner_len];
            let action =
                parse_action(inner).map_err(|reason| syntax_error(offset + start, &reason))?;
            action.write_handlebars(&mut handlebars_source);

            let consumed = inner_start + inner_len + CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }
        handlebars_source.push_str(rest);

        Ok(Self { handlebars_source })
    }

    /// Renders the template with the fields of `data`.
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String, HookError> {
        let mut engine = Handlebars::new();
        engine.set_strict_mode(true);
        engine.register_escape_fn(handlebars::no_escape);

        engine
            .render_template(&self.handlebars_source, data)
            .map_err(|e| HookError::TemplateRender(e.to_string()))
    }
}

impl Action<'_> {
    fn write_handlebars(&self, out: &mut String) {
        out.push_str(OPEN);
        if self.trim_left {
            out.push('~');
        }
        out.push_str(self.field);
        if self.trim_right {
            out.push('~');
        }
        out.push_str(CLOSE);
    }
}

/// Appends literal text that is followed by an action.
///
/// Handlebars reads `\{{` as an escaped mustache and `\\{{` as one backslash
/// before a mustache, so a trailing backslash is doubled.
fn push_literal(out: &mut String, literal: &str) {
    out.push_str(literal);
    if literal.ends_with('\\') {
        out.push('\\');
    }
}

fn syntax_error(offset: usize, reason: &str) -> HookError {
    HookError::TemplateSyntax {
        offset,
        reason: reason.to_string(),
    }
}

/// Parses the text between `{{` and `}}`.
fn parse_action(inner: &str) -> Result<Action<'_>, String> {
    let mut body = inner;

    // Trim markers need whitespace on the inner side, as in `{{- .X -}}`.
    let trim_left = body.starts_with('-') && body[1..].starts_with(char::is_whitespace);
    if trim_left {
        body = &body[1..];
    }
    let trim_right = body.ends_with('-') && body[..body.len() - 1].ends_with(char::is_whitespace);
    if trim_right {
        body = &body[..body.len() - 1];
    }

    let expression = body.trim();
    if expression.is_empty() {
        return Err("missing value for action".to_string());
    }

    let field = expression.strip_prefix('.').unwrap_or(expression);
    if field.is_empty() {
        return Err("'.' must be followed by a field name".to_string());
    }

    let mut chars = field.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !starts_well || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("unexpected {expression:?} in action"));
    }
    if RESERVED.contains(&field) {
        return Err(format!("can't evaluate field {field}"));
    }

    Ok(Action {
        field,
        trim_left,
        trim_right,
    })
}
