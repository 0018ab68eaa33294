//! Capabilities the controllers render into.
//!
//! These stand in for the page: the preview pane, the document title, the
//! status line, the loading overlay and the export button. Implementations
//! must be shareable across tasks because responses land on spawned tasks.

use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewStatus {
    Rendering,
    Updated,
    Failed(String),
}

pub trait PreviewSurface: Send + Sync {
    /// Replace the preview output.
    fn apply(&self, html: &str, css: &str);
    fn set_document_title(&self, title: &str);
    fn set_status(&self, status: PreviewStatus);
}

pub trait OverlayHost: Send + Sync {
    fn mount_overlay(&self);
    fn unmount_overlay(&self);
}

pub trait ExportSurface: Send + Sync {
    fn set_trigger_enabled(&self, enabled: bool);
    /// Blocking, user-visible error.
    fn alert(&self, message: &str);
}

/// The single loading overlay. Showing it while visible reuses the mounted one.
pub struct LoadingOverlay {
    host: Arc<dyn OverlayHost>,
    visible: Mutex<bool>,
}

impl LoadingOverlay {
    pub fn new(host: Arc<dyn OverlayHost>) -> Self {
        Self {
            host,
            visible: Mutex::new(false),
        }
    }

    /// Returns true if this call mounted the overlay.
    pub fn show(&self) -> bool {
        let mut visible = self.visible.lock();
        if *visible {
            return false;
        }
        self.host.mount_overlay();
        *visible = true;
        true
    }

    pub fn hide(&self) {
        let mut visible = self.visible.lock();
        if *visible {
            self.host.unmount_overlay();
            *visible = false;
        }
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.lock()
    }
}
