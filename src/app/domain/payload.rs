use serde::{Deserialize, Serialize};

use super::theme::Theme;

/// Body POSTed to both the preview and the export endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRequest {
    pub markdown: String,
    pub theme: Theme,
    pub title: String,
}

impl PreviewRequest {
    pub fn new(markdown: impl Into<String>, theme: Theme) -> Self {
        let title = theme.title.clone();
        Self {
            markdown: markdown.into(),
            theme,
            title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PreviewResponse {
    pub html: String,
    pub css: String,
}

/// Error shape shared by both endpoints. A missing or unparsable body is `{}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// The server's message, or `fallback` when it sent none.
    pub fn message_or(self, fallback: impl FnOnce() -> String) -> String {
        match self.error {
            Some(msg) if !msg.trim().is_empty() => msg,
            _ => fallback(),
        }
    }
}
