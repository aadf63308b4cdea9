//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PromptCaller - fill prompt templates and send them to an AI chat
#[derive(Parser, Debug)]
#[command(
    name = "pc",
    author,
    version,
    about = "Fill prompt templates from the terminal and send them to a clipboard or AI chat"
)]
pub struct Cli {
    /// Directory holding prompts/ and stocks.json (interactive run)
    #[arg(value_name = "BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Directory holding prompts/ and stocks.json
    #[arg(short = 'd', long = "base-dir", global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (default: interactive run)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Base directory from either the positional argument or `--base-dir`
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.base_dir.clone().or_else(|| self.dir.clone())
    }
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pick a template, fill it in and send it somewhere (the default)
    Run {
        /// Template name, skipping the template menu
        #[arg(short, long)]
        template: Option<String>,

        /// Output target key (clipboard, pplx, ...), skipping the output menu
        #[arg(short, long)]
        output: Option<String>,

        /// Use the plain lookup prompt even on a terminal
        #[arg(long)]
        no_live: bool,
    },

    /// List available templates
    List,

    /// Show the placeholders a template declares
    Vars {
        /// Template name
        name: String,
    },

    /// Search the reference dataset
    Search {
        /// Code or name fragment
        query: String,

        /// Maximum results to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// List output targets
    Platforms,
}
