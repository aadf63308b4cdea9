//! Output targets for a rendered prompt
//!
//! The clipboard is always the first target; browser platforms follow in
//! configured order. Delivery never fails the run: when a sink is missing
//! the content is printed for manual copying.

mod browser;
mod clipboard;

pub use browser::{BrowserSink, SystemBrowser};
pub use clipboard::{ClipboardSink, SystemClipboard};

use std::fmt;

use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OutputConfig;
use crate::console::Prompter;
use crate::error::PromptError;

const QUERY_SLOT: &str = "{query}";
const RULER_WIDTH: usize = 50;

/// A chat page the prompt can be sent to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Short name used on the command line
    pub key: String,

    /// Name shown in menus
    pub label: String,

    /// Page to open; a `{query}` slot receives the percent-encoded prompt
    pub url: String,
}

impl Platform {
    /// Whether the prompt travels in the URL instead of the clipboard
    pub fn is_parameterized(&self) -> bool {
        self.url.contains(QUERY_SLOT)
    }

    /// URL to open for `content`
    pub fn url_for(&self, content: &str) -> String {
        if !self.is_parameterized() {
            return self.url.clone();
        }
        self.url.replace(QUERY_SLOT, &urlencoding::encode(content))
    }
}

/// Where the rendered prompt goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Clipboard,
    Platform(Platform),
}

impl OutputTarget {
    pub fn key(&self) -> &str {
        match self {
            Self::Clipboard => "clipboard",
            Self::Platform(p) => &p.key,
        }
    }

    /// Menu line for this target
    pub fn describe(&self) -> String {
        match self {
            Self::Clipboard => "Copy to clipboard".to_string(),
            Self::Platform(p) if p.is_parameterized() => format!("Open {} ({})", p.label, p.key),
            Self::Platform(p) => format!("Open {} ({}) - paste manually", p.label, p.key),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// All targets in menu order
pub fn targets(config: &OutputConfig) -> Vec<OutputTarget> {
    std::iter::once(OutputTarget::Clipboard)
        .chain(config.platforms.iter().cloned().map(OutputTarget::Platform))
        .collect()
}

/// Position of the target named `key`
pub fn position_of(targets: &[OutputTarget], key: &str) -> Option<usize> {
    targets.iter().position(|t| t.key().eq_ignore_ascii_case(key))
}

/// What actually happened during delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Copied,
    Opened { copied: bool },
    PrintedForManualCopy,
}

fn print_for_manual_copy(content: &str, prompter: &mut dyn Prompter) -> Result<Delivery, PromptError> {
    let ruler = "-".repeat(RULER_WIDTH);
    prompter.say("")?;
    prompter.say("Copy the content below manually:")?;
    prompter.say(&ruler)?;
    prompter.say(content)?;
    prompter.say(&ruler)?;
    Ok(Delivery::PrintedForManualCopy)
}

/// Send `content` to `target`, degrading to printing it
pub fn deliver(
    content: &str,
    target: &OutputTarget,
    clipboard: &mut dyn ClipboardSink,
    browser: &dyn BrowserSink,
    prompter: &mut dyn Prompter,
) -> Result<Delivery, PromptError> {
    debug!(%target, len = content.len(), "deliver: called");
    match target {
        OutputTarget::Clipboard => match clipboard.copy(content) {
            Ok(()) => {
                prompter.say(&format!("{} Copied to clipboard", "✓".green()))?;
                Ok(Delivery::Copied)
            }
            Err(e) => {
                warn!(error = %e, "Clipboard copy failed");
                prompter.say(&format!("{} {}", "Warning:".yellow(), e))?;
                print_for_manual_copy(content, prompter)
            }
        },
        OutputTarget::Platform(platform) => {
            let mut copied = false;
            if !platform.is_parameterized() {
                match clipboard.copy(content) {
                    Ok(()) => {
                        copied = true;
                        prompter.say(&format!("{} Copied to clipboard", "✓".green()))?;
                    }
                    Err(e) => warn!(error = %e, "Clipboard copy before opening browser failed"),
                }
            }

            match browser.open(&platform.url_for(content)) {
                Ok(()) => {
                    prompter.say(&format!("{} Opened {} in the browser", "✓".green(), platform.label))?;
                    if copied {
                        prompter.say(&format!("Paste the prompt into {} (Cmd/Ctrl+V)", platform.label))?;
                    }
                    Ok(Delivery::Opened { copied })
                }
                Err(e) => {
                    warn!(error = %e, "Browser launch failed");
                    prompter.say(&format!("{} {}", "Warning:".yellow(), e))?;
                    print_for_manual_copy(content, prompter)
                }
            }
        }
    }
}
