//! PromptCaller - fill prompt templates from the terminal
//!
//! A template is a markdown file whose `[...]` tokens are variables. The
//! user picks a template, every variable is resolved (from the clock, from a
//! searchable reference dataset, or as typed text), and the rendered prompt
//! is copied to the clipboard or opened in an AI chat page.
//!
//! # Modules
//!
//! - [`template`] - placeholder extraction, rendering and the template directory
//! - [`dataset`] - the reference dataset index and its substring search
//! - [`resolve`] - per-placeholder resolution and the lookup strategies
//! - [`output`] - clipboard and browser delivery
//! - [`app`] - the end-to-end interactive run
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod app;
pub mod cli;
pub mod config;
pub mod console;
pub mod dataset;
pub mod error;
pub mod menu;
pub mod output;
pub mod resolve;
pub mod template;

pub use app::{App, RunOptions, RunOutcome, Sinks};
pub use config::Config;
pub use console::{LinePrompter, Prompter, StdioPrompter};
pub use dataset::{DatasetIndex, Record, format_record, read_dataset};
pub use error::PromptError;
pub use output::{BrowserSink, ClipboardSink, Delivery, OutputTarget, Platform, SystemBrowser, SystemClipboard};
pub use resolve::{LiveLookup, LookupStrategy, Resolver, SimpleLookup, probe};
pub use template::{
    Autofill, Keywords, Placeholder, PlaceholderKind, Template, TemplateStore, ValueMap, extract, parse, render,
};
