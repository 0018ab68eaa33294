//! Preview written to a standalone HTML file.
//!
//! The file is rewritten whenever the preview output or the document title
//! changes, so it can be kept open in a browser and reloaded.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::app::domain::PRODUCT_NAME;
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::surface::{PreviewStatus, PreviewSurface};

#[derive(Debug, Default, Clone)]
struct PageState {
    html: Option<String>,
    css: String,
    title: String,
    error: Option<String>,
}

pub struct PreviewPage {
    path: PathBuf,
    state: Mutex<PageState>,
}

impl PreviewPage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(PageState {
                title: PRODUCT_NAME.to_string(),
                ..Default::default()
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render(&self) -> String {
        let state = self.state.lock();
        page_html(&state)
    }

    /// Write the current page to disk.
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, self.render())?;
        Ok(())
    }

    fn flush_logged(&self) {
        if let Err(e) = self.flush() {
            log::warn!("Failed to write preview to {}: {}", self.path.display(), e);
        }
    }
}

impl PreviewSurface for PreviewPage {
    fn apply(&self, html: &str, css: &str) {
        {
            let mut state = self.state.lock();
            state.html = Some(html.to_string());
            state.css = css.to_string();
        }
        self.flush_logged();
    }

    fn set_document_title(&self, title: &str) {
        self.state.lock().title = title.to_string();
        self.flush_logged();
    }

    fn set_status(&self, status: PreviewStatus) {
        {
            let mut state = self.state.lock();
            match status {
                PreviewStatus::Failed(message) => state.error = Some(message),
                PreviewStatus::Updated => state.error = None,
                PreviewStatus::Rendering => return,
            }
        }
        self.flush_logged();
    }
}

fn page_html(state: &PageState) -> String {
    let body = state
        .html
        .as_deref()
        .unwrap_or("<p class=\"placeholder\">Waiting for the first preview</p>");
    // Failures keep the last output and show the message above it
    let banner = state
        .error
        .as_deref()
        .map(|message| format!("<p class=\"preview-error\">{}</p>\n", escape_text(message)))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{}</title>\n<style>\n{}\n</style>\n</head>\n<body>\n{}{}\n</body>\n</html>\n",
        escape_text(&state.title),
        state.css,
        banner,
        body
    )
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
