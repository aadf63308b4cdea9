//! Placeholder resolution
//!
//! Turns the placeholder list of a template into a [`ValueMap`]:
//!
//! - autofill placeholders are computed from the clock
//! - lookup placeholders are searched in the [`DatasetIndex`] through a
//!   [`LookupStrategy`] chosen once at startup by [`probe`]
//! - everything else is read as a plain line

mod live;
mod simple;

pub use live::{CandidateHint, LineSource, LiveLookup, LookupHelper};
pub use simple::SimpleLookup;

use std::env;
use std::io::{self, IsTerminal};

use chrono::{Local, NaiveDateTime};
use colored::Colorize;
use rustyline::DefaultEditor;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::console::Prompter;
use crate::dataset::{DatasetIndex, Record};
use crate::error::PromptError;
use crate::menu::{self, MenuOptions};
use crate::template::{Autofill, Placeholder, PlaceholderKind, ValueMap};

/// How a lookup placeholder is asked for
pub trait LookupStrategy {
    fn name(&self) -> &'static str;

    /// Obtain one formatted record for the placeholder labelled `label`
    fn resolve(&mut self, label: &str, index: &DatasetIndex, prompter: &mut dyn Prompter) -> Result<String, PromptError>;
}

/// Result of one lookup query
#[derive(Debug, PartialEq, Eq)]
pub enum LookupOutcome<'a> {
    NoMatch,
    Single(&'a Record),
    Several(Vec<&'a Record>),
}

/// Search `query` and classify the result by match count
pub fn lookup<'a>(index: &'a DatasetIndex, query: &str, limit: usize) -> LookupOutcome<'a> {
    let mut results = index.search(query, limit);
    match results.len() {
        0 => LookupOutcome::NoMatch,
        1 => LookupOutcome::Single(results.remove(0)),
        _ => LookupOutcome::Several(results),
    }
}

/// Value of an autofill placeholder at `now`
pub fn autofill_value(autofill: Autofill, now: &NaiveDateTime) -> String {
    match autofill {
        Autofill::Date => now.format("%Y-%m-%d").to_string(),
        Autofill::Time => now.format("%H:%M:%S").to_string(),
    }
}

/// Terminals the line editor drives without raw mode
const UNSUPPORTED_TERMS: [&str; 3] = ["dumb", "cons25", "emacs"];

/// Whether `term` (the `TERM` value) can host the live editor
pub fn supports_live_editing(term: Option<&str>) -> bool {
    match term {
        Some(term) => !UNSUPPORTED_TERMS.iter().any(|t| t.eq_ignore_ascii_case(term)),
        None => true,
    }
}

/// Pick the lookup strategy for this process.
///
/// The live editor is used only when enabled, both stdin and stdout are
/// terminals of a kind the editor supports and the editor can be created;
/// otherwise the plain prompt.
pub fn probe(search: &SearchConfig) -> Box<dyn LookupStrategy> {
    if !search.live {
        debug!("probe: live search disabled");
        return Box::new(SimpleLookup::new(search.limit));
    }
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        debug!("probe: not a terminal");
        return Box::new(SimpleLookup::new(search.limit));
    }
    let term = env::var("TERM").ok();
    if !supports_live_editing(term.as_deref()) {
        info!(?term, "Terminal lacks line editing, using plain lookup");
        return Box::new(SimpleLookup::new(search.limit));
    }

    match DefaultEditor::with_config(live::editor_config()) {
        Ok(_) => {
            info!("Live search enabled");
            Box::new(LiveLookup::new(search.limit, search.live_limit))
        }
        Err(e) => {
            warn!(error = %e, "Line editor unavailable, using plain lookup");
            Box::new(SimpleLookup::new(search.limit))
        }
    }
}

/// Read a typed value, honoring the placeholder's declared metadata
fn read_text(placeholder: &Placeholder, prompter: &mut dyn Prompter) -> Result<String, PromptError> {
    let label = placeholder.display_name.as_str();
    if let Some(hint) = &placeholder.hint {
        prompter.say(&format!("  {} {}", label, hint.dimmed()))?;
    }

    if !placeholder.options.is_empty() {
        let options = &placeholder.options;
        for (i, option) in options.iter().enumerate() {
            prompter.say(&format!("    {}. {}", i + 1, option))?;
        }
        let default = placeholder
            .default
            .as_ref()
            .and_then(|d| options.iter().position(|o| o == d));
        let menu_options = MenuOptions {
            default,
            allow_quit: false,
        };
        let prompt = format!("  {} (1-{}): ", label, options.len());
        let choice = menu::choose(prompter, &prompt, options.len(), &menu_options)?;
        return Ok(choice.map(|i| options[i].clone()).unwrap_or_default());
    }

    let prompt = match &placeholder.default {
        Some(default) => format!("  {} [{}]: ", label, default),
        None => format!("  {}: ", label),
    };
    loop {
        let value = prompter.read_line(&prompt)?;
        let value = value.trim();
        if !value.is_empty() {
            return Ok(value.to_string());
        }
        if let Some(default) = &placeholder.default {
            return Ok(default.clone());
        }
        if !placeholder.required {
            return Ok(String::new());
        }
        prompter.say(&format!("    {}", "A value is required".yellow()))?;
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Resolves placeholders one by one in extraction order
pub struct Resolver<'a> {
    index: &'a mut DatasetIndex,
    strategy: Box<dyn LookupStrategy>,
    clock: fn() -> NaiveDateTime,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a mut DatasetIndex, strategy: Box<dyn LookupStrategy>) -> Self {
        Self {
            index,
            strategy,
            clock: local_now,
        }
    }

    /// Replace the wall clock used for autofill
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Resolve every placeholder, stopping only on user abort
    pub fn resolve_all(
        &mut self,
        placeholders: &[Placeholder],
        prompter: &mut dyn Prompter,
    ) -> Result<ValueMap, PromptError> {
        let mut values = ValueMap::new();
        for placeholder in placeholders {
            let value = self.resolve_one(placeholder, prompter)?;
            values.insert(placeholder.id.clone(), value);
        }
        Ok(values)
    }

    pub fn resolve_one(&mut self, placeholder: &Placeholder, prompter: &mut dyn Prompter) -> Result<String, PromptError> {
        debug!(id = %placeholder.id, kind = %placeholder.kind, "Resolver::resolve_one: called");
        let label = placeholder.display_name.as_str();

        if let Some(autofill) = placeholder.autofill {
            let value = autofill_value(autofill, &(self.clock)());
            prompter.say(&format!("  {}: {} {}", label, value, "(auto)".dimmed()))?;
            return Ok(value);
        }

        match placeholder.kind {
            PlaceholderKind::Lookup => {
                self.ensure_loaded(prompter)?;
                self.strategy.resolve(label, self.index, prompter)
            }
            _ => read_text(placeholder, prompter),
        }
    }

    fn ensure_loaded(&mut self, prompter: &mut dyn Prompter) -> Result<(), PromptError> {
        if self.index.is_loaded() {
            return Ok(());
        }

        let count = self.index.load().len();
        match self.index.warning() {
            Some(warning) => prompter.say(&format!("{} {}", "Warning:".yellow(), warning))?,
            None => prompter.say(&format!(
                "{} Loaded {} records from {}",
                "✓".green(),
                count,
                self.index.source().display()
            ))?,
        }
        Ok(())
    }
}
