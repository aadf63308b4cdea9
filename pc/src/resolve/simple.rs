//! Plain prompt lookup: type a query, pick from a numbered list

use colored::Colorize;
use tracing::debug;

use super::{LookupOutcome, LookupStrategy, lookup};
use crate::console::Prompter;
use crate::dataset::{DatasetIndex, format_record};
use crate::error::PromptError;
use crate::menu::{self, MenuOptions};

/// Search a query and settle on one record.
///
/// Returns `None` when nothing matched and the caller should ask again.
pub(crate) fn settle(
    query: &str,
    index: &DatasetIndex,
    limit: usize,
    prompter: &mut dyn Prompter,
) -> Result<Option<String>, PromptError> {
    match lookup(index, query, limit) {
        LookupOutcome::NoMatch => {
            prompter.say(&format!("    {}", "No matching record, try again".yellow()))?;
            Ok(None)
        }
        LookupOutcome::Single(record) => {
            let value = format_record(record);
            prompter.say(&format!("    {} {}", "→".green(), value))?;
            Ok(Some(value))
        }
        LookupOutcome::Several(records) => {
            prompter.say("")?;
            prompter.say("    Matches:")?;
            for (i, record) in records.iter().enumerate() {
                prompter.say(&format!(
                    "    {}. {} ({}) [{}]",
                    i + 1,
                    record.name,
                    record.code.cyan(),
                    record.category.dimmed()
                ))?;
            }

            let prompt = format!("    Select (1-{}): ", records.len());
            let choice = menu::choose(prompter, &prompt, records.len(), &MenuOptions::default())?;
            Ok(choice.map(|i| format_record(records[i])))
        }
    }
}

/// Line-by-line lookup used when no rich editor is available
#[derive(Debug, Clone)]
pub struct SimpleLookup {
    limit: usize,
}

impl SimpleLookup {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl LookupStrategy for SimpleLookup {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn resolve(&mut self, label: &str, index: &DatasetIndex, prompter: &mut dyn Prompter) -> Result<String, PromptError> {
        debug!(%label, "SimpleLookup::resolve: called");
        let prompt = format!("  {} (code or name): ", label);
        loop {
            let query = prompter.read_line(&prompt)?;
            let query = query.trim();
            if query.is_empty() {
                continue;
            }

            if let Some(value) = settle(query, index, self.limit, prompter)? {
                return Ok(value);
            }
        }
    }
}
