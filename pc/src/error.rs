//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by template, dataset, menu and output operations
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Not found: {path}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("Malformed dataset {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid selection '{input}', expected a number between 1 and {max}")]
    InvalidSelection { input: String, max: usize },

    #[error("{sink} unavailable: {reason}")]
    SinkUnavailable { sink: &'static str, reason: String },

    #[error("Cancelled by user")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PromptError {
    /// Check if this is a user abort that should unwind to a clean exit
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PromptError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selection_message() {
        let err = PromptError::InvalidSelection {
            input: "abc".to_string(),
            max: 8,
        };

        let msg = err.to_string();
        assert!(msg.contains("abc"));
        assert!(msg.contains("1 and 8"));
    }

    #[test]
    fn test_is_cancelled() {
        assert!(PromptError::Cancelled.is_cancelled());
        assert!(
            !PromptError::TemplateNotFound {
                name: "x".to_string()
            }
            .is_cancelled()
        );
    }

    #[test]
    fn test_source_messages() {
        let not_found = PromptError::NotFound {
            path: PathBuf::from("/missing/stocks.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(not_found.to_string(), "Not found: /missing/stocks.json");

        let malformed = PromptError::Malformed {
            path: PathBuf::from("stocks.json"),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        assert!(malformed.to_string().starts_with("Malformed dataset stocks.json"));

        let sink = PromptError::SinkUnavailable {
            sink: "clipboard",
            reason: "no display".to_string(),
        };
        assert_eq!(sink.to_string(), "clipboard unavailable: no display");
    }
}
