//! PromptCaller CLI entry point

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use promptcaller::app::{App, RunOptions, RunOutcome, Sinks};
use promptcaller::cli::{Cli, Command};
use promptcaller::config::Config;
use promptcaller::console::StdioPrompter;
use promptcaller::dataset::format_record;
use promptcaller::output::{self, SystemBrowser, SystemClipboard};
use promptcaller::resolve;
use promptcaller::template::parse;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptcaller")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("promptcaller.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    // The tool stays usable without a log file
    if let Err(e) = setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()) {
        eprintln!("{} {:#}", "Warning:".yellow(), e);
    }

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.paths = config.paths.with_base_dir(cli.base_dir());

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => cmd_run(&config, RunOptions::default()),
        Some(Command::Run {
            template,
            output,
            no_live,
        }) => {
            if no_live {
                config.search.live = false;
            }
            cmd_run(&config, RunOptions { template, output })
        }
        Some(Command::List) => cmd_list(&config),
        Some(Command::Vars { name }) => cmd_vars(&config, &name),
        Some(Command::Search { query, limit }) => cmd_search(&config, &query, limit),
        Some(Command::Platforms) => cmd_platforms(&config),
    }
}

fn cmd_run(config: &Config, options: RunOptions) -> Result<()> {
    let strategy = resolve::probe(&config.search);
    info!(strategy = strategy.name(), "Lookup strategy selected");

    let mut app = App::new(config);
    let mut prompter = StdioPrompter::new();
    let mut clipboard = SystemClipboard::new();
    let browser = SystemBrowser;
    let sinks = Sinks {
        clipboard: &mut clipboard,
        browser: &browser,
    };

    match app.run(&options, strategy, &mut prompter, sinks) {
        Ok(RunOutcome::Delivered(delivery)) => {
            info!(?delivery, "Run complete");
            Ok(())
        }
        Ok(RunOutcome::Quit) => Ok(()),
        Err(e) if e.is_cancelled() => {
            println!("\n\n{}", "Cancelled".yellow());
            Ok(())
        }
        Err(e) => Err(e).context("Interactive run failed"),
    }
}

fn cmd_list(config: &Config) -> Result<()> {
    let app = App::new(config);
    match app.store().list() {
        Ok(names) if names.is_empty() => println!("No templates found in {}", app.store().dir().display()),
        Ok(names) => {
            for name in names {
                println!("{}", name);
            }
        }
        Err(e) => println!("{} {}", "Warning:".yellow(), e),
    }
    Ok(())
}

fn cmd_vars(config: &Config, name: &str) -> Result<()> {
    let app = App::new(config);
    let content = app.store().read(name)?;
    let template = parse(&content, &config.keywords);

    if let Some(title) = &template.title {
        println!("{}", title.bold());
    }
    if template.placeholders.is_empty() {
        println!("{} has no variables", name.cyan());
        return Ok(());
    }

    for p in template.placeholders {
        let mut notes = Vec::new();
        if let Some(autofill) = p.autofill {
            notes.push(format!("auto: {}", autofill));
        }
        if let Some(default) = &p.default {
            notes.push(format!("default: {}", default));
        }
        if !p.options.is_empty() {
            notes.push(format!("options: {}", p.options.join("/")));
        }
        if p.required {
            notes.push("required".to_string());
        }
        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!(" ({})", notes.join(", "))
        };
        println!("{:20} {}{}", p.id, p.kind.to_string().yellow(), notes.dimmed());
    }
    Ok(())
}

fn cmd_search(config: &Config, query: &str, limit: Option<usize>) -> Result<()> {
    let mut app = App::new(config);
    let index = app.index_mut();
    index.load();
    if let Some(warning) = index.warning() {
        println!("{} {}", "Warning:".yellow(), warning);
    }

    let results = index.search(query, limit.unwrap_or(config.search.limit));
    if results.is_empty() {
        println!("No matches for '{}'", query);
        return Ok(());
    }

    for (i, record) in results.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}]  {}",
            i + 1,
            record.name,
            record.code.cyan(),
            record.category.dimmed(),
            format_record(record)
        );
    }
    Ok(())
}

fn cmd_platforms(config: &Config) -> Result<()> {
    for (i, target) in output::targets(&config.output).iter().enumerate() {
        let marker = if target.key().eq_ignore_ascii_case(&config.output.default) {
            " (default)".green().to_string()
        } else {
            String::new()
        };
        let key = format!("{:10}", target.key());
        println!("{}. {} {}{}", i + 1, key.cyan(), target.describe(), marker);
    }
    Ok(())
}
