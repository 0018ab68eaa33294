//! Fakes shared by the controller and session tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::app::controllers::theme_model::ThemeModel;
use crate::app::domain::{InMemoryControls, PreviewRequest, PreviewResponse, Theme, ThemeDefaults};
use crate::app::infrastructure::error::{RenderError, Result};
use crate::app::infrastructure::surface::{ExportSurface, OverlayHost, PreviewStatus, PreviewSurface};
use crate::app::services::download::DownloadSink;
use crate::app::services::render_client::RenderService;

/// Theme gathered from the built-in defaults, with the given title.
pub fn sample_theme(title: &str) -> Theme {
    let model = ThemeModel::new(ThemeDefaults::default());
    let mut controls = InMemoryControls::new();
    let mut bullets = model.bullet_editor();
    let mut ordered = model.ordered_editor();
    model.seed(&mut controls, &mut bullets, &mut ordered);
    let mut theme = model.gather(&controls, &bullets, &ordered);
    theme.title = title.to_string();
    theme
}

/// Render service keyed on the markdown text of each request.
#[derive(Default)]
pub struct FakeRenderService {
    pub previews: Mutex<Vec<PreviewRequest>>,
    pub exports: Mutex<Vec<PreviewRequest>>,
    delays: Mutex<HashMap<String, Duration>>,
    failures: Mutex<HashMap<String, RenderError>>,
    export_result: Mutex<Option<std::result::Result<Vec<u8>, RenderError>>>,
}

impl FakeRenderService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn delay(&self, markdown: &str, delay: Duration) {
        self.delays.lock().insert(markdown.to_string(), delay);
    }

    pub fn fail(&self, markdown: &str, error: RenderError) {
        self.failures.lock().insert(markdown.to_string(), error);
    }

    pub fn export_returns(&self, result: std::result::Result<Vec<u8>, RenderError>) {
        *self.export_result.lock() = Some(result);
    }

    pub fn preview_markdowns(&self) -> Vec<String> {
        self.previews.lock().iter().map(|r| r.markdown.clone()).collect()
    }

    pub fn html_for(markdown: &str) -> String {
        format!("<div class=\"document\">{}</div>", markdown)
    }
}

#[async_trait]
impl RenderService for FakeRenderService {
    async fn preview(&self, request: &PreviewRequest) -> std::result::Result<PreviewResponse, RenderError> {
        self.previews.lock().push(request.clone());
        let delay = self.delays.lock().get(&request.markdown).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.failures.lock().get(&request.markdown).cloned() {
            return Err(err);
        }
        Ok(PreviewResponse {
            html: Self::html_for(&request.markdown),
            css: ".document {}".to_string(),
        })
    }

    async fn export(&self, request: &PreviewRequest) -> std::result::Result<Vec<u8>, RenderError> {
        self.exports.lock().push(request.clone());
        let delay = self.delays.lock().get(&request.markdown).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.export_result
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(b"%PDF-1.7 fake".to_vec()))
    }
}

/// Records everything the controllers render.
#[derive(Default)]
pub struct RecordingSurface {
    pub applied: Mutex<Vec<(String, String)>>,
    pub titles: Mutex<Vec<String>>,
    pub statuses: Mutex<Vec<PreviewStatus>>,
    pub overlay_mounts: Mutex<usize>,
    pub overlay_visible: Mutex<bool>,
    pub trigger_enabled: Mutex<Vec<bool>>,
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last_html(&self) -> Option<String> {
        self.applied.lock().last().map(|(html, _)| html.clone())
    }

    pub fn last_status(&self) -> Option<PreviewStatus> {
        self.statuses.lock().last().cloned()
    }

    pub fn trigger_is_enabled(&self) -> bool {
        self.trigger_enabled.lock().last().copied().unwrap_or(true)
    }
}

impl PreviewSurface for RecordingSurface {
    fn apply(&self, html: &str, css: &str) {
        self.applied.lock().push((html.to_string(), css.to_string()));
    }

    fn set_document_title(&self, title: &str) {
        self.titles.lock().push(title.to_string());
    }

    fn set_status(&self, status: PreviewStatus) {
        self.statuses.lock().push(status);
    }
}

impl OverlayHost for RecordingSurface {
    fn mount_overlay(&self) {
        *self.overlay_mounts.lock() += 1;
        *self.overlay_visible.lock() = true;
    }

    fn unmount_overlay(&self) {
        *self.overlay_visible.lock() = false;
    }
}

impl ExportSurface for RecordingSurface {
    fn set_trigger_enabled(&self, enabled: bool) {
        self.trigger_enabled.lock().push(enabled);
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }
}

/// Keeps saved downloads in memory.
#[derive(Default)]
pub struct MemoryDownloads {
    pub saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryDownloads {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl DownloadSink for MemoryDownloads {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.saved.lock().push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}
