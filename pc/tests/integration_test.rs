//! Integration tests for PromptCaller
//!
//! These tests drive the whole run through a scripted prompter and fake sinks,
//! and exercise the `pc` binary against a fixture directory.

use std::cell::RefCell;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use promptcaller::app::{App, RunOptions, RunOutcome, Sinks};
use promptcaller::config::{Config, PathsConfig};
use promptcaller::console::LinePrompter;
use promptcaller::output::{BrowserSink, ClipboardSink, Delivery};
use promptcaller::resolve::SimpleLookup;
use promptcaller::PromptError;
use tempfile::TempDir;

// =============================================================================
// Fixtures
// =============================================================================

const STOCKS: &str = r#"[
  {"code": "AAPL", "name": "苹果", "market": "US"},
  {"code": "AMZN", "name": "亚马逊", "market": "US"},
  {"code": "600519", "name": "贵州茅台", "market": "SH"}
]"#;

const DAILY: &str = "---
title: 日报
tags: [macro, daily]
variables:
  主题:
    default: 宏观
---
今日 [主题]，[股票代码]
";

fn fixture() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let prompts = temp.path().join("prompts");
    fs::create_dir_all(&prompts).unwrap();

    fs::write(prompts.join("analysis.md"), "分析 [股票代码]，主题：[主题]，再看 [股票代码]").unwrap();
    fs::write(prompts.join("plain.md"), "No variables here.").unwrap();
    fs::write(prompts.join("README.md"), "not a template").unwrap();
    fs::write(temp.path().join("stocks.json"), STOCKS).unwrap();
    temp
}

fn config_for(base: &Path) -> Config {
    let mut config = Config::default();
    config.paths = PathsConfig::default().with_base_dir(Some(base.to_path_buf()));
    config.search.live = false;
    config
}

#[derive(Default)]
struct RecordingClipboard {
    copied: Vec<String>,
}

impl ClipboardSink for RecordingClipboard {
    fn copy(&mut self, text: &str) -> Result<(), PromptError> {
        self.copied.push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingBrowser {
    opened: RefCell<Vec<String>>,
}

impl BrowserSink for RecordingBrowser {
    fn open(&self, url: &str) -> Result<(), PromptError> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

struct RunResult {
    outcome: Result<RunOutcome, PromptError>,
    output: String,
    copied: Vec<String>,
    opened: Vec<String>,
}

fn run_app(config: &Config, options: RunOptions, input: &str) -> RunResult {
    let mut app = App::new(config);
    let mut prompter = LinePrompter::new(Cursor::new(input.to_string()), Vec::new());
    let mut clipboard = RecordingClipboard::default();
    let browser = RecordingBrowser::default();

    let outcome = app.run(
        &options,
        Box::new(SimpleLookup::new(config.search.limit)),
        &mut prompter,
        Sinks {
            clipboard: &mut clipboard,
            browser: &browser,
        },
    );

    let (_, out) = prompter.into_inner();
    RunResult {
        outcome,
        output: String::from_utf8(out).unwrap(),
        copied: clipboard.copied,
        opened: browser.opened.into_inner(),
    }
}

// =============================================================================
// App Tests
// =============================================================================

#[test]
fn test_full_run_to_clipboard() {
    let temp = fixture();
    let config = config_for(temp.path());

    // template 1 (analysis), query "a" -> pick 2, topic, output 1 (clipboard)
    let result = run_app(&config, RunOptions::default(), "1\na\n2\n估值\n1\n");

    assert_eq!(result.outcome.unwrap(), RunOutcome::Delivered(Delivery::Copied));
    assert_eq!(result.copied, vec!["分析 亚马逊，AMZN，主题：估值，再看 亚马逊，AMZN"]);
    assert!(result.output.contains("1. analysis"));
    assert!(result.output.contains("2. plain"));
    assert!(!result.output.contains("README"));
    assert!(result.output.contains("Loaded 3 records"));
    assert!(result.output.contains("Done!"));
}

#[test]
fn test_default_output_opens_platform() {
    let temp = fixture();
    let config = config_for(temp.path());

    let options = RunOptions {
        template: Some("plain".to_string()),
        output: None,
    };
    let result = run_app(&config, options, "\n");

    assert_eq!(result.outcome.unwrap(), RunOutcome::Delivered(Delivery::Opened { copied: true }));
    assert_eq!(result.copied, vec!["No variables here."]);
    assert_eq!(result.opened, vec!["https://www.perplexity.ai/"]);
    assert!(result.output.contains("no variables"));
}

#[test]
fn test_preselected_output_skips_menu() {
    let temp = fixture();
    let config = config_for(temp.path());

    let options = RunOptions {
        template: Some("analysis".to_string()),
        output: Some("kimi".to_string()),
    };
    let result = run_app(&config, options, "茅台\n\n");

    assert_eq!(result.outcome.unwrap(), RunOutcome::Delivered(Delivery::Opened { copied: true }));
    assert_eq!(result.copied, vec!["分析 贵州茅台，600519，主题：，再看 贵州茅台，600519"]);
    assert_eq!(result.opened, vec!["https://kimi.moonshot.cn/"]);
    assert!(!result.output.contains("Output:"));
}

#[test]
fn test_quit_from_template_menu() {
    let temp = fixture();
    let config = config_for(temp.path());

    let result = run_app(&config, RunOptions::default(), "q\n");
    assert_eq!(result.outcome.unwrap(), RunOutcome::Quit);
    assert!(result.copied.is_empty());
}

#[test]
fn test_eof_mid_run_is_cancel() {
    let temp = fixture();
    let config = config_for(temp.path());

    let result = run_app(&config, RunOptions::default(), "1\n");
    assert!(result.outcome.unwrap_err().is_cancelled());
    assert!(result.copied.is_empty());
    assert!(result.opened.is_empty());
}

#[test]
fn test_missing_template_dir_degrades() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path());

    let result = run_app(&config, RunOptions::default(), "");
    assert_eq!(result.outcome.unwrap(), RunOutcome::Quit);
    assert!(result.output.contains("Warning:"));
    assert!(result.output.contains("No templates found"));
}

#[test]
fn test_unknown_template_degrades() {
    let temp = fixture();
    let config = config_for(temp.path());

    let options = RunOptions {
        template: Some("ghost".to_string()),
        output: None,
    };
    let result = run_app(&config, options, "");
    assert_eq!(result.outcome.unwrap(), RunOutcome::Quit);
    assert!(result.output.contains("Template not found: ghost"));
}

#[test]
fn test_frontmatter_template_run() {
    let temp = fixture();
    fs::write(temp.path().join("prompts").join("daily.md"), DAILY).unwrap();
    let config = config_for(temp.path());

    let options = RunOptions {
        template: Some("daily".to_string()),
        output: Some("clipboard".to_string()),
    };
    let result = run_app(&config, options, "\nAAPL\n");

    assert_eq!(result.outcome.unwrap(), RunOutcome::Delivered(Delivery::Copied));
    assert_eq!(result.copied, vec!["今日 宏观，苹果，AAPL\n"]);
    assert!(result.output.contains("日报"));
    assert!(result.output.contains("[宏观]"));
    assert!(!result.output.contains("macro"));
}

// =============================================================================
// CLI Tests
// =============================================================================

fn pc(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pc").expect("pc binary");
    cmd.current_dir(temp.path())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .env("XDG_DATA_HOME", temp.path().join(".local/share"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_list() {
    let temp = fixture();
    pc(&temp)
        .args(["list", "--base-dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("analysis").and(predicate::str::contains("plain")))
        .stdout(predicate::str::contains("README").not());
}

#[test]
fn test_cli_vars() {
    let temp = fixture();
    pc(&temp)
        .args(["vars", "analysis"])
        .assert()
        .success()
        .stdout(predicate::str::contains("股票代码").and(predicate::str::contains("lookup")))
        .stdout(predicate::str::contains("主题").and(predicate::str::contains("text")));
}

#[test]
fn test_cli_vars_skips_frontmatter() {
    let temp = fixture();
    fs::write(temp.path().join("prompts").join("daily.md"), DAILY).unwrap();
    pc(&temp)
        .args(["vars", "daily"])
        .assert()
        .success()
        .stdout(predicate::str::contains("日报"))
        .stdout(predicate::str::contains("default: 宏观"))
        .stdout(predicate::str::contains("股票代码").and(predicate::str::contains("lookup")))
        .stdout(predicate::str::contains("macro").not());
}

#[test]
fn test_cli_search() {
    let temp = fixture();
    pc(&temp)
        .args(["search", "aapl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("苹果，AAPL"));
}

#[test]
fn test_cli_search_missing_dataset() {
    let temp = TempDir::new().unwrap();
    pc(&temp)
        .args(["search", "aapl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning:").and(predicate::str::contains("No matches")));
}

#[test]
fn test_cli_platforms() {
    let temp = TempDir::new().unwrap();
    pc(&temp)
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("clipboard").and(predicate::str::contains("pplx")));
}

#[cfg(target_os = "linux")]
#[test]
fn test_cli_user_config_sets_log_level() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join(".config").join("promptcaller");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("promptcaller.yml"), "log-level: debug\n").unwrap();

    pc(&temp).env_remove("RUST_LOG").arg("platforms").assert().success();

    let log_file = temp.path().join(".local/share/promptcaller/logs/promptcaller.log");
    let log = fs::read_to_string(log_file).unwrap();
    assert!(log.contains("Level(Debug)"));
    assert!(log.contains("main: dispatching command"));
}

#[test]
fn test_cli_run_cancel_exits_cleanly() {
    let temp = fixture();
    pc(&temp)
        .args(["run", "--template", "analysis", "--no-live"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));
}
