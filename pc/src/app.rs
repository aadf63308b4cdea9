//! The interactive run: pick, fill, preview, deliver

use colored::Colorize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::console::Prompter;
use crate::dataset::DatasetIndex;
use crate::error::PromptError;
use crate::menu::{self, MenuOptions};
use crate::output::{self, BrowserSink, ClipboardSink, Delivery, OutputTarget};
use crate::resolve::{LookupStrategy, Resolver};
use crate::template::{TemplateStore, parse, render};

const RULER_WIDTH: usize = 50;

/// Preselections for one run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Template name; asked for when `None`
    pub template: Option<String>,
    /// Output target key; asked for when `None`
    pub output: Option<String>,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Delivered(Delivery),
    /// The user backed out or there was nothing to work with
    Quit,
}

/// The sinks a run may deliver to
pub struct Sinks<'s> {
    pub clipboard: &'s mut dyn ClipboardSink,
    pub browser: &'s dyn BrowserSink,
}

/// First `max_lines` lines of `text`, and whether anything was cut
pub fn preview(text: &str, max_lines: usize) -> (String, bool) {
    let lines: Vec<&str> = text.lines().collect();
    let shown = lines.iter().take(max_lines).copied().collect::<Vec<_>>().join("\n");
    (shown, lines.len() > max_lines)
}

/// One end-to-end session over a template directory and a dataset
pub struct App<'c> {
    config: &'c Config,
    store: TemplateStore,
    index: DatasetIndex,
}

impl<'c> App<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self {
            config,
            store: TemplateStore::new(config.paths.prompts_dir()),
            index: DatasetIndex::new(config.paths.dataset_file()),
        }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn index_mut(&mut self) -> &mut DatasetIndex {
        &mut self.index
    }

    /// Run the whole flow.
    ///
    /// Only a user abort is returned as an error; every other failure is
    /// reported to the user and narrows the run instead.
    pub fn run(
        &mut self,
        options: &RunOptions,
        strategy: Box<dyn LookupStrategy>,
        prompter: &mut dyn Prompter,
        sinks: Sinks<'_>,
    ) -> Result<RunOutcome, PromptError> {
        let ruler = "=".repeat(RULER_WIDTH);
        prompter.say(&ruler)?;
        prompter.say(&format!("  {}", "PromptCaller - fill a prompt template".bright_cyan().bold()))?;
        if strategy.name() == "live" {
            prompter.say(&format!("  {}", "Live search enabled".green()))?;
        }
        prompter.say(&ruler)?;

        let Some(name) = self.pick_template(options, prompter)? else {
            return Ok(RunOutcome::Quit);
        };

        let content = match self.store.read(&name) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "Template unreadable");
                prompter.say(&format!("{} {}", "Error:".red(), e))?;
                return Ok(RunOutcome::Quit);
            }
        };
        info!(template = %name, "Template selected");

        let template = parse(&content, &self.config.keywords);
        if let Some(title) = &template.title {
            prompter.say("")?;
            prompter.say(&format!("{} {}", "Template:".bold(), title))?;
        }
        if let Some(description) = &template.description {
            prompter.say(&format!("  {}", description.dimmed()))?;
        }

        let placeholders = &template.placeholders;
        let result = if placeholders.is_empty() {
            prompter.say("")?;
            prompter.say("This template has no variables, using it as is")?;
            template.body.clone()
        } else {
            prompter.say("")?;
            prompter.say(&format!("Fill in {} variable(s):", placeholders.len()))?;
            prompter.say(&"-".repeat(RULER_WIDTH))?;

            let mut resolver = Resolver::new(&mut self.index, strategy);
            let values = resolver.resolve_all(placeholders, prompter)?;
            render(&template.body, &values)
        };

        let (shown, truncated) = preview(&result, self.config.preview_lines);
        prompter.say("")?;
        prompter.say(&ruler)?;
        prompter.say("Preview:")?;
        prompter.say(&ruler)?;
        prompter.say(&shown)?;
        if truncated {
            prompter.say("...")?;
        }
        prompter.say(&ruler)?;

        let targets = output::targets(&self.config.output);
        let Some(target) = self.pick_output(&targets, options, prompter)? else {
            return Ok(RunOutcome::Quit);
        };

        let delivery = output::deliver(&result, target, sinks.clipboard, sinks.browser, prompter)?;
        prompter.say("")?;
        prompter.say(&format!("{} Done!", "✓".green()))?;
        Ok(RunOutcome::Delivered(delivery))
    }

    fn pick_template(&self, options: &RunOptions, prompter: &mut dyn Prompter) -> Result<Option<String>, PromptError> {
        if let Some(name) = &options.template {
            debug!(%name, "pick_template: preselected");
            return Ok(Some(name.clone()));
        }

        let names = match self.store.list() {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "Template directory unavailable");
                prompter.say(&format!("{} {}", "Warning:".yellow(), e))?;
                Vec::new()
            }
        };
        if names.is_empty() {
            prompter.say(&format!("No templates found in {}", self.store.dir().display()))?;
            return Ok(None);
        }

        prompter.say("")?;
        prompter.say("Available prompts:")?;
        prompter.say(&"-".repeat(RULER_WIDTH))?;
        for (i, name) in names.iter().enumerate() {
            prompter.say(&format!("{}. {}", i + 1, name))?;
        }
        prompter.say(&"-".repeat(RULER_WIDTH))?;

        let options = MenuOptions {
            default: None,
            allow_quit: true,
        };
        let prompt = format!("Choose a prompt (1-{}) or q to quit: ", names.len());
        let choice = menu::choose(prompter, &prompt, names.len(), &options)?;
        Ok(choice.map(|i| names[i].clone()))
    }

    fn pick_output<'t>(
        &self,
        targets: &'t [OutputTarget],
        options: &RunOptions,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<&'t OutputTarget>, PromptError> {
        if let Some(key) = &options.output {
            match output::position_of(targets, key) {
                Some(i) => return Ok(Some(&targets[i])),
                None => prompter.say(&format!("{} Unknown output '{}'", "Warning:".yellow(), key))?,
            }
        }

        let default = output::position_of(targets, &self.config.output.default);
        prompter.say("")?;
        prompter.say("Output:")?;
        prompter.say(&"-".repeat(RULER_WIDTH))?;
        for (i, target) in targets.iter().enumerate() {
            let marker = if Some(i) == default { " (default)" } else { "" };
            prompter.say(&format!("{}. {}{}", i + 1, target.describe(), marker))?;
        }
        prompter.say(&"-".repeat(RULER_WIDTH))?;

        let options = MenuOptions {
            default,
            allow_quit: true,
        };
        let prompt = format!("Choose an output (1-{}): ", targets.len());
        let choice = menu::choose(prompter, &prompt, targets.len(), &options)?;
        Ok(choice.map(|i| &targets[i]))
    }
}
