//! Placeholder extraction
//!
//! A placeholder is any `[...]` run without nested brackets. Each distinct id
//! is reported once, in first-seen order, with a kind inferred from the
//! configured keyword sets.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Matches one bracket-delimited token and captures its inner text
pub(crate) static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("placeholder pattern is valid"));

/// How a placeholder gets its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Text,
    Date,
    Time,
    /// Resolved by searching the reference dataset
    Lookup,
}

impl PlaceholderKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Time => "time",
            Self::Lookup => "lookup",
        }
    }
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Values computed from the clock instead of asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Autofill {
    Date,
    Time,
}

impl fmt::Display for Autofill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Time => write!(f, "time"),
        }
    }
}

/// A variable declared by a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Raw bracketed text, also the dedup key
    pub id: String,
    pub display_name: String,
    pub kind: PlaceholderKind,
    pub autofill: Option<Autofill>,

    /// Value taken when the prompt is left empty
    pub default: Option<String>,
    pub hint: Option<String>,
    /// Allowed values; asked for as a numbered menu when non-empty
    pub options: Vec<String>,
    /// Empty input is refused when there is no default
    pub required: bool,
}

impl Placeholder {
    /// Placeholder for `id` typed by `keywords`, with no declared metadata
    pub fn new(id: &str, keywords: &Keywords) -> Self {
        let (kind, autofill) = keywords.classify(id);
        Self {
            id: id.to_string(),
            display_name: id.trim().to_string(),
            kind,
            autofill,
            default: None,
            hint: None,
            options: Vec::new(),
            required: false,
        }
    }
}

/// Keyword sets driving kind inference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Keywords {
    /// Ids that are exactly one of these become date placeholders
    pub date: Vec<String>,

    /// Ids that are exactly one of these become time placeholders
    pub time: Vec<String>,

    /// Ids containing any of these become lookup placeholders
    pub lookup: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            date: vec!["日期".to_string(), "当前日期".to_string()],
            time: vec!["时间".to_string(), "当前时间".to_string()],
            lookup: vec!["股票".to_string()],
        }
    }
}

impl Keywords {
    /// Infer kind and autofill for an id.
    ///
    /// Checked in order date, time, lookup, text: an id matching several
    /// categories takes the first.
    pub fn classify(&self, id: &str) -> (PlaceholderKind, Option<Autofill>) {
        if self.date.iter().any(|k| k == id) {
            (PlaceholderKind::Date, Some(Autofill::Date))
        } else if self.time.iter().any(|k| k == id) {
            (PlaceholderKind::Time, Some(Autofill::Time))
        } else if self.lookup.iter().any(|k| !k.is_empty() && id.contains(k.as_str())) {
            (PlaceholderKind::Lookup, None)
        } else {
            (PlaceholderKind::Text, None)
        }
    }
}

/// Extract the distinct placeholders of `text` in first-seen order
pub fn extract(text: &str, keywords: &Keywords) -> Vec<Placeholder> {
    let mut seen = HashSet::new();
    let mut placeholders = Vec::new();

    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let id = &caps[1];
        // `[ ]` and friends are markdown checkboxes, not variables
        if id.trim().is_empty() || !seen.insert(id.to_string()) {
            continue;
        }

        placeholders.push(Placeholder::new(id, keywords));
    }

    debug!(count = placeholders.len(), "extract: done");
    placeholders
}
