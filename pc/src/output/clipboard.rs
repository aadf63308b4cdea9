//! System clipboard sink

use tracing::debug;

use crate::error::PromptError;

/// Somewhere rendered text can be copied to
pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<(), PromptError>;
}

/// Clipboard backed by `arboard`.
///
/// The handle is opened on first use and kept for the life of the process;
/// on X11/Wayland the copied text is only served while it exists.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unavailable(e: arboard::Error) -> PromptError {
    PromptError::SinkUnavailable {
        sink: "clipboard",
        reason: e.to_string(),
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), PromptError> {
        debug!(len = text.len(), "SystemClipboard::copy: called");
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(unavailable)?,
        };
        self.inner.insert(clipboard).set_text(text).map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_never_panics() {
        // Headless CI usually has no clipboard; either outcome is fine
        let mut clipboard = SystemClipboard::new();
        match clipboard.copy("test") {
            Ok(()) => {}
            Err(e) => assert!(e.to_string().starts_with("clipboard unavailable")),
        }
    }
}
