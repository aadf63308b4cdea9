//! Live lookup on a rustyline editor
//!
//! Matches are recomputed on every keystroke: the best candidate is shown as
//! a dimmed hint and Tab cycles through the candidates, inserting the
//! formatted record. Enter runs the same search-and-settle step as the plain
//! lookup, so both strategies end on the same value.

use std::borrow::Cow;

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Context, Editor, Helper};
use tracing::{debug, warn};

use super::simple::{SimpleLookup, settle};
use super::LookupStrategy;
use crate::console::Prompter;
use crate::dataset::{DatasetIndex, format_record};
use crate::error::PromptError;

/// Editor settings shared by the probe and every lookup prompt
pub(crate) fn editor_config() -> rustyline::Config {
    rustyline::Config::builder()
        .completion_type(CompletionType::Circular)
        .auto_add_history(false)
        .build()
}

/// Inline preview of the best candidate; never inserted into the line
#[derive(Debug, Clone)]
pub struct CandidateHint {
    display: String,
}

impl Hint for CandidateHint {
    fn display(&self) -> &str {
        &self.display
    }

    fn completion(&self) -> Option<&str> {
        None
    }
}

/// rustyline helper answering completions and hints from the dataset
pub struct LookupHelper<'a> {
    index: &'a DatasetIndex,
    limit: usize,
}

impl<'a> LookupHelper<'a> {
    pub fn new(index: &'a DatasetIndex, limit: usize) -> Self {
        Self { index, limit }
    }

    /// Candidates for the text typed so far
    pub fn candidates(&self, typed: &str) -> Vec<Pair> {
        self.index
            .search(typed, self.limit)
            .into_iter()
            .map(|record| Pair {
                display: format!("{} ({}) [{}]", record.name, record.code, record.category),
                replacement: format_record(record),
            })
            .collect()
    }
}

impl Completer for LookupHelper<'_> {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        // A candidate replaces everything typed before the cursor
        Ok((0, self.candidates(&line[..pos])))
    }
}

impl Hinter for LookupHelper<'_> {
    type Hint = CandidateHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<CandidateHint> {
        if line.is_empty() || pos < line.len() {
            return None;
        }

        let matches = self.index.search(line, self.limit);
        let best = format_record(matches.first()?);
        if best == line {
            return None;
        }

        let display = match matches.len() {
            1 => format!("  → {}", best),
            n => format!("  → {} (+{} more, Tab to cycle)", best, n - 1),
        };
        Some(CandidateHint { display })
    }
}

impl Highlighter for LookupHelper<'_> {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for LookupHelper<'_> {}

impl Helper for LookupHelper<'_> {}

/// Where the live lookup reads its lines from
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError>;
}

impl LineSource for Editor<LookupHelper<'_>, DefaultHistory> {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        self.readline(prompt)
    }
}

/// Lookup through a live-suggesting line editor.
///
/// An editor failure other than a user abort switches this strategy to the
/// plain lookup for the rest of the run.
pub struct LiveLookup {
    live_limit: usize,
    fallback: SimpleLookup,
    limit: usize,
    degraded: bool,
}

impl LiveLookup {
    pub fn new(limit: usize, live_limit: usize) -> Self {
        Self {
            live_limit,
            fallback: SimpleLookup::new(limit),
            limit,
            degraded: false,
        }
    }

    /// Whether an editor failure has switched this strategy to the plain prompt
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    fn degrade(
        &mut self,
        reason: &dyn std::fmt::Display,
        label: &str,
        index: &DatasetIndex,
        prompter: &mut dyn Prompter,
    ) -> Result<String, PromptError> {
        warn!(error = %reason, "Live lookup failed, falling back to plain prompt");
        prompter.say(&format!("    {} {}", "Input error:".red(), reason))?;
        self.degraded = true;
        self.fallback.resolve(label, index, prompter)
    }

    /// Read lines from `source` until one settles on a record
    pub fn resolve_from(
        &mut self,
        source: &mut dyn LineSource,
        label: &str,
        index: &DatasetIndex,
        prompter: &mut dyn Prompter,
    ) -> Result<String, PromptError> {
        prompter.say(&format!("  {} (type a code or name, suggestions appear as you type):", label))?;
        prompter.say(&format!("    {}", "Tab cycles through matches, Enter confirms".dimmed()))?;

        loop {
            match source.read_line("    > ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        prompter.say("    Nothing entered, try again")?;
                        continue;
                    }
                    if let Some(record) = index.find_formatted(line) {
                        return Ok(format_record(record));
                    }
                    if let Some(value) = settle(line, index, self.limit, prompter)? {
                        return Ok(value);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Err(PromptError::Cancelled),
                Err(e) => return self.degrade(&e, label, index, prompter),
            }
        }
    }
}

impl LookupStrategy for LiveLookup {
    fn name(&self) -> &'static str {
        "live"
    }

    fn resolve(&mut self, label: &str, index: &DatasetIndex, prompter: &mut dyn Prompter) -> Result<String, PromptError> {
        debug!(%label, degraded = self.degraded, "LiveLookup::resolve: called");
        if self.degraded {
            return self.fallback.resolve(label, index, prompter);
        }

        let mut editor = match Editor::<LookupHelper<'_>, DefaultHistory>::with_config(editor_config()) {
            Ok(editor) => editor,
            Err(e) => return self.degrade(&e, label, index, prompter),
        };
        editor.set_helper(Some(LookupHelper::new(index, self.live_limit)));
        self.resolve_from(&mut editor, label, index, prompter)
    }
}
