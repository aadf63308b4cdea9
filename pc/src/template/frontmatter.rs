//! YAML frontmatter at the top of a template
//!
//! A template may open with a `---` fenced YAML block carrying a title, a
//! description and per-variable metadata. The block is never part of the
//! rendered prompt. A block that is not a YAML mapping is treated as
//! ordinary text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;
use tracing::{debug, warn};

use super::extract::{Autofill, PlaceholderKind};

static FRONTMATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A---\r?\n((?s:.*?))\r?\n---\r?\n?").expect("frontmatter pattern is valid"));

/// Metadata a template declares for one variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VariableMeta {
    /// Declared type: `stock`, `date`, `time`, or a text-like type
    #[serde(rename = "type")]
    pub kind: Option<String>,

    pub required: bool,

    /// Value used when the prompt is left empty
    #[serde(deserialize_with = "scalar_string")]
    pub default: Option<String>,

    /// Short help shown next to the prompt
    pub hint: Option<String>,

    /// Example input shown when there is no hint
    pub placeholder: Option<String>,

    /// Allowed values, offered as a numbered menu
    pub options: Vec<String>,

    #[serde(rename = "autoFill", alias = "auto-fill", alias = "autofill")]
    pub auto_fill: Option<String>,
}

impl VariableMeta {
    /// Kind and autofill implied by the declared type and autofill, if any
    pub fn declared_kind(&self) -> Option<(PlaceholderKind, Option<Autofill>)> {
        let auto = match self.auto_fill.as_deref() {
            Some("date") => Some(Autofill::Date),
            Some("time") => Some(Autofill::Time),
            _ => None,
        };

        match (self.kind.as_deref(), auto) {
            (_, Some(Autofill::Date)) | (Some("date"), None) => Some((PlaceholderKind::Date, Some(Autofill::Date))),
            (_, Some(Autofill::Time)) | (Some("time"), None) => Some((PlaceholderKind::Time, Some(Autofill::Time))),
            (Some("stock"), None) => Some((PlaceholderKind::Lookup, None)),
            (Some(_), None) => Some((PlaceholderKind::Text, None)),
            (None, None) => None,
        }
    }
}

/// Accept any YAML scalar (`default: 5`, `default: true`) as a string
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFrontmatter {
    title: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    variables: Value,
}

/// Parsed frontmatter block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Declared variables in declaration order
    pub variables: Vec<(String, VariableMeta)>,
}

impl Frontmatter {
    /// Metadata declared for the variable named `name`
    pub fn meta(&self, name: &str) -> Option<&VariableMeta> {
        self.variables.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }
}

/// `variables` is either a mapping `name: meta` or a list of metas with an `id`
fn declared_variables(value: Value) -> Vec<(String, VariableMeta)> {
    let entries: Vec<(String, Value)> = match value {
        Value::Mapping(map) => map
            .into_iter()
            .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v)))
            .collect(),
        Value::Sequence(items) => items
            .into_iter()
            .filter_map(|item| {
                let id = item.get("id")?.as_str()?.to_string();
                Some((id, item))
            })
            .collect(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|(name, v)| {
            let meta = if v.is_null() {
                VariableMeta::default()
            } else {
                match serde_yaml::from_value::<VariableMeta>(v) {
                    Ok(meta) => meta,
                    Err(e) => {
                        warn!(variable = %name, error = %e, "Ignoring malformed variable metadata");
                        return None;
                    }
                }
            };
            let name = name.trim().to_string();
            (!name.is_empty()).then_some((name, meta))
        })
        .collect()
}

/// Split `text` into its frontmatter and the body after it.
///
/// Without a well-formed block the whole text is the body.
pub fn split_frontmatter(text: &str) -> (Option<Frontmatter>, &str) {
    let Some(caps) = FRONTMATTER_RE.captures(text) else {
        return (None, text);
    };

    let value: Value = match serde_yaml::from_str(&caps[1]) {
        Ok(value @ Value::Mapping(_)) => value,
        Ok(_) => return (None, text),
        Err(e) => {
            debug!(error = %e, "split_frontmatter: not YAML, keeping block as text");
            return (None, text);
        }
    };
    let raw: RawFrontmatter = match serde_yaml::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed template frontmatter");
            return (None, text);
        }
    };

    let frontmatter = Frontmatter {
        title: raw.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        description: raw.description,
        tags: raw.tags,
        variables: declared_variables(raw.variables),
    };
    let body_start = caps.get(0).map(|m| m.end()).unwrap_or(0);
    (Some(frontmatter), &text[body_start..])
}
