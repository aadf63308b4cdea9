//! Browser launch sink

use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::PromptError;

/// Something that can open a URL for the user
pub trait BrowserSink {
    fn open(&self, url: &str) -> Result<(), PromptError>;
}

/// Opens URLs with the platform's default handler
#[derive(Debug, Default, Clone)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn command(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl BrowserSink for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), PromptError> {
        debug!(%url, "SystemBrowser::open: called");
        let unavailable = |reason: String| PromptError::SinkUnavailable { sink: "browser", reason };

        let status = Self::command(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| unavailable(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(unavailable(format!("opener exited with {}", status)))
        }
    }
}
