//! A template split into its metadata, body and variables

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::extract::{Keywords, Placeholder, extract};
use super::frontmatter::{Frontmatter, VariableMeta, split_frontmatter};

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("heading pattern is valid"));

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Frontmatter title, else the first `# ` heading of the body
    pub title: Option<String>,
    pub description: Option<String>,
    /// Text that gets rendered, frontmatter removed
    pub body: String,
    /// Body placeholders in first-seen order, then variables only the
    /// frontmatter declares
    pub placeholders: Vec<Placeholder>,
}

fn apply_meta(placeholder: &mut Placeholder, meta: &VariableMeta) {
    if let Some((kind, autofill)) = meta.declared_kind() {
        placeholder.kind = kind;
        placeholder.autofill = autofill;
    }
    if meta.default.is_some() {
        // A declared default replaces the clock value
        placeholder.autofill = None;
    }
    placeholder.default = meta.default.clone();
    placeholder.hint = meta.hint.clone().or_else(|| meta.placeholder.clone());
    placeholder.options = meta.options.clone();
    placeholder.required = meta.required;
}

fn merge(body: &str, frontmatter: &Frontmatter, keywords: &Keywords) -> Vec<Placeholder> {
    let mut placeholders = extract(body, keywords);
    for (name, _) in &frontmatter.variables {
        if !placeholders.iter().any(|p| &p.display_name == name) {
            placeholders.push(Placeholder::new(name, keywords));
        }
    }

    for placeholder in &mut placeholders {
        if let Some(meta) = frontmatter.meta(&placeholder.display_name) {
            apply_meta(placeholder, meta);
        }
    }
    placeholders
}

/// Parse raw template text
pub fn parse(text: &str, keywords: &Keywords) -> Template {
    let (frontmatter, body) = split_frontmatter(text);
    let frontmatter = frontmatter.unwrap_or_default();
    let placeholders = merge(body, &frontmatter, keywords);
    debug!(
        count = placeholders.len(),
        declared = frontmatter.variables.len(),
        "parse: done"
    );

    let title = frontmatter
        .title
        .clone()
        .or_else(|| HEADING_RE.captures(body).map(|c| c[1].trim().to_string()));

    Template {
        title,
        description: frontmatter.description,
        body: body.to_string(),
        placeholders,
    }
}
