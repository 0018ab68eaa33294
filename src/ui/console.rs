//! Terminal-backed status line, overlay and export button.

use crate::app::infrastructure::surface::{ExportSurface, OverlayHost, PreviewStatus, PreviewSurface};

/// Reports preview status and export progress on stderr.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    quiet: bool,
}

impl ConsoleSurface {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl PreviewSurface for ConsoleSurface {
    fn apply(&self, html: &str, css: &str) {
        log::debug!("Preview output: {} bytes html, {} bytes css", html.len(), css.len());
    }

    fn set_document_title(&self, title: &str) {
        log::debug!("Document title: {}", title);
    }

    fn set_status(&self, status: PreviewStatus) {
        match status {
            PreviewStatus::Rendering => log::debug!("Rendering preview..."),
            PreviewStatus::Updated => {
                if !self.quiet {
                    eprintln!("Preview updated");
                }
            }
            PreviewStatus::Failed(message) => eprintln!("Preview error: {}", message),
        }
    }
}

impl OverlayHost for ConsoleSurface {
    fn mount_overlay(&self) {
        if !self.quiet {
            eprintln!("Exporting PDF...");
        }
    }

    fn unmount_overlay(&self) {
        log::debug!("Export overlay removed");
    }
}

impl ExportSurface for ConsoleSurface {
    fn set_trigger_enabled(&self, enabled: bool) {
        log::debug!("Export trigger {}", if enabled { "enabled" } else { "disabled" });
    }

    fn alert(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
}
