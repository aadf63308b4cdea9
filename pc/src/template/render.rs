//! Template rendering

use std::collections::BTreeMap;

use regex::Captures;
use tracing::debug;

use super::extract::PLACEHOLDER_RE;

/// Resolved values keyed by placeholder id
pub type ValueMap = BTreeMap<String, String>;

/// Substitute every `[id]` token whose id has a value.
///
/// Tokens are replaced in a single pass, so inserted values are never
/// rescanned and ids are compared literally. Tokens without a value are left
/// as they are.
pub fn render(text: &str, values: &ValueMap) -> String {
    debug!(values = values.len(), "render: called");
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
