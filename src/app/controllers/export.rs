//! PDF export: one request at a time behind the loading overlay.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use crate::app::domain::PreviewRequest;
use crate::app::infrastructure::surface::{ExportSurface, LoadingOverlay};
use crate::app::services::download::{DownloadSink, download_filename};
use crate::app::services::render_client::RenderService;

#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Failed(String),
    /// Another export was already running; nothing was sent.
    Busy,
}

pub struct ExportController {
    service: Arc<dyn RenderService>,
    surface: Arc<dyn ExportSurface>,
    overlay: Arc<LoadingOverlay>,
    downloads: Arc<dyn DownloadSink>,
    busy: AtomicBool,
}

/// Undoes the busy state however the export ends, including cancellation.
struct BusyGuard<'a> {
    controller: &'a ExportController,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.controller.overlay.hide();
        self.controller.surface.set_trigger_enabled(true);
        self.controller.busy.store(false, Ordering::SeqCst);
    }
}

impl ExportController {
    pub fn new(
        service: Arc<dyn RenderService>,
        surface: Arc<dyn ExportSurface>,
        overlay: Arc<LoadingOverlay>,
        downloads: Arc<dyn DownloadSink>,
    ) -> Self {
        Self {
            service,
            surface,
            overlay,
            downloads,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub async fn export(&self, request: PreviewRequest) -> ExportOutcome {
        if self.busy.swap(true, Ordering::SeqCst) {
            log::debug!("Export already running, ignoring request");
            return ExportOutcome::Busy;
        }

        self.overlay.show();
        self.surface.set_trigger_enabled(false);
        let _guard = BusyGuard { controller: self };

        log::info!("Exporting \"{}\" to PDF", request.title);
        let outcome = match self.service.export(&request).await {
            Ok(bytes) => {
                let filename = download_filename(&request.title, Utc::now());
                match self.downloads.save(&filename, &bytes) {
                    Ok(path) => {
                        log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
                        ExportOutcome::Saved(path)
                    }
                    Err(e) => ExportOutcome::Failed(format!("Failed to save PDF: {}", e)),
                }
            }
            Err(e) => ExportOutcome::Failed(e.to_string()),
        };

        if let ExportOutcome::Failed(message) = &outcome {
            log::error!("Export failed: {}", message);
            self.surface.alert(message);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::app::infrastructure::error::{AppError, RenderError, Result};
    use crate::app::testing::{FakeRenderService, MemoryDownloads, RecordingSurface, sample_theme};

    struct Harness {
        service: Arc<FakeRenderService>,
        surface: Arc<RecordingSurface>,
        overlay: Arc<LoadingOverlay>,
        downloads: Arc<MemoryDownloads>,
        export: Arc<ExportController>,
    }

    fn harness() -> Harness {
        let service = FakeRenderService::new();
        let surface = RecordingSurface::new();
        let overlay = Arc::new(LoadingOverlay::new(surface.clone()));
        let downloads = MemoryDownloads::new();
        let export = Arc::new(ExportController::new(
            service.clone(),
            surface.clone(),
            overlay.clone(),
            downloads.clone(),
        ));
        Harness { service, surface, overlay, downloads, export }
    }

    fn request(markdown: &str, title: &str) -> PreviewRequest {
        PreviewRequest::new(markdown, sample_theme(title))
    }

    fn assert_restored(h: &Harness) {
        assert!(!h.overlay.is_visible());
        assert!(!*h.surface.overlay_visible.lock());
        assert!(h.surface.trigger_is_enabled());
        assert!(!h.export.is_busy());
    }

    #[tokio::test]
    async fn test_export_saves_timestamped_pdf() {
        let h = harness();
        let outcome = h.export.export(request("# Hi", "Report")).await;

        let saved = h.downloads.saved.lock().clone();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].0.starts_with("Report-"));
        assert!(saved[0].0.ends_with("Z.pdf"));
        assert!(!saved[0].0.contains(':'));
        assert_eq!(saved[0].1, b"%PDF-1.7 fake");
        assert_eq!(outcome, ExportOutcome::Saved(PathBuf::from(&saved[0].0)));

        assert_eq!(*h.surface.trigger_enabled.lock(), vec![false, true]);
        assert_eq!(*h.surface.overlay_mounts.lock(), 1);
        assert!(h.surface.alerts.lock().is_empty());
        assert_restored(&h);
    }

    #[tokio::test]
    async fn test_blank_title_uses_document_name() {
        let h = harness();
        h.export.export(request("text", "")).await;
        let saved = h.downloads.saved.lock().clone();
        assert!(saved[0].0.starts_with("document-"));
    }

    #[tokio::test]
    async fn test_server_error_alerts_and_restores() {
        let h = harness();
        h.service.export_returns(Err(RenderError::Server {
            status: 500,
            message: "render failed".into(),
        }));

        let outcome = h.export.export(request("# Hi", "Report")).await;
        assert_eq!(outcome, ExportOutcome::Failed("render failed".into()));
        assert_eq!(*h.surface.alerts.lock(), vec!["render failed".to_string()]);
        assert!(h.downloads.saved.lock().is_empty());
        assert_restored(&h);
    }

    #[tokio::test]
    async fn test_network_error_restores() {
        let h = harness();
        h.service
            .export_returns(Err(RenderError::Network("PDF export failed: connection refused".into())));
        let outcome = h.export.export(request("x", "t")).await;
        assert!(matches!(outcome, ExportOutcome::Failed(m) if m.contains("connection refused")));
        assert_restored(&h);
    }

    struct FailingDownloads;

    impl DownloadSink for FailingDownloads {
        fn save(&self, _filename: &str, _bytes: &[u8]) -> Result<PathBuf> {
            Err(AppError::Io(std::io::Error::other("disk full")))
        }
    }

    #[tokio::test]
    async fn test_save_failure_alerts() {
        let service = FakeRenderService::new();
        let surface = RecordingSurface::new();
        let overlay = Arc::new(LoadingOverlay::new(surface.clone()));
        let export = ExportController::new(service, surface.clone(), overlay.clone(), Arc::new(FailingDownloads));

        let outcome = export.export(request("x", "t")).await;
        let ExportOutcome::Failed(message) = outcome else {
            panic!("expected failure");
        };
        assert!(message.starts_with("Failed to save PDF: "));
        assert_eq!(surface.alerts.lock().len(), 1);
        assert!(!overlay.is_visible());
        assert!(surface.trigger_is_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_export_while_busy_is_refused() {
        let h = harness();
        h.service.delay("slow", Duration::from_millis(200));

        let export = h.export.clone();
        let first = tokio::spawn(async move { export.export(request("slow", "A")).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(h.export.is_busy());
        assert!(h.overlay.is_visible());

        assert_eq!(h.export.export(request("other", "B")).await, ExportOutcome::Busy);
        // The busy request must not tear down the running one's overlay
        assert!(h.overlay.is_visible());

        assert!(matches!(first.await.unwrap(), ExportOutcome::Saved(_)));
        assert_eq!(h.service.exports.lock().len(), 1);
        assert_eq!(*h.surface.overlay_mounts.lock(), 1);
        assert_restored(&h);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_export_still_cleans_up() {
        let h = harness();
        h.service.delay("slow", Duration::from_millis(500));

        let export = h.export.clone();
        let task = tokio::spawn(async move { export.export(request("slow", "A")).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(h.overlay.is_visible());

        task.abort();
        let _ = task.await;
        assert_restored(&h);
    }
}
