use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::controllers::bullets::{BulletRow, BulletSequenceEditor};
use super::controllers::export::{ExportController, ExportOutcome};
use super::controllers::ordered::{DigitRow, OrderedSequenceEditor};
use super::controllers::preview::{InFlight, PreviewSynchronizer, SnapshotFn, SyncPhase};
use super::controllers::theme_model::ThemeModel;
use super::domain::{ControlBindings, ControlValue, Message, PreviewRequest, Theme, ThemeDefaults, ThemeField};
use super::infrastructure::surface::{ExportSurface, LoadingOverlay, PreviewSurface};
use super::services::download::DownloadSink;
use super::services::render_client::RenderService;

/// Everything the user edits. Guarded by one lock so a snapshot always sees
/// the controls, both editors and the markdown together.
pub struct Workspace {
    pub controls: Box<dyn ControlBindings>,
    pub bullets: BulletSequenceEditor,
    pub ordered: OrderedSequenceEditor,
    pub markdown: String,
}

/// External collaborators of a session.
pub struct SessionServices {
    pub renderer: Arc<dyn RenderService>,
    pub preview_surface: Arc<dyn PreviewSurface>,
    pub export_surface: Arc<dyn ExportSurface>,
    pub overlay: Arc<LoadingOverlay>,
    pub downloads: Arc<dyn DownloadSink>,
    pub debounce: Duration,
}

/// What `handle_message` did with an event.
#[derive(Debug)]
pub enum Handled {
    Ignored,
    PreviewScheduled,
    ExportStarted(JoinHandle<ExportOutcome>),
}

pub struct EditorSession {
    model: Arc<ThemeModel>,
    workspace: Arc<Mutex<Workspace>>,
    preview: PreviewSynchronizer,
    export: Arc<ExportController>,
}

fn snapshot_of(model: &ThemeModel, workspace: &Mutex<Workspace>) -> PreviewRequest {
    let ws = workspace.lock();
    let theme = model.gather(ws.controls.as_ref(), &ws.bullets, &ws.ordered);
    PreviewRequest::new(ws.markdown.clone(), theme)
}

impl EditorSession {
    /// Seed `controls` from `defaults` and wire the controllers together.
    pub fn new(
        defaults: ThemeDefaults,
        mut controls: Box<dyn ControlBindings>,
        markdown: impl Into<String>,
        services: SessionServices,
    ) -> Self {
        let model = Arc::new(ThemeModel::new(defaults));
        let mut bullets = model.bullet_editor();
        let mut ordered = model.ordered_editor();
        model.seed(controls.as_mut(), &mut bullets, &mut ordered);

        let workspace = Arc::new(Mutex::new(Workspace {
            controls,
            bullets,
            ordered,
            markdown: markdown.into(),
        }));

        let snapshot: Box<SnapshotFn> = {
            let model = Arc::clone(&model);
            let workspace = Arc::clone(&workspace);
            Box::new(move || snapshot_of(&model, &workspace))
        };

        let preview = PreviewSynchronizer::new(
            Arc::clone(&services.renderer),
            services.preview_surface,
            snapshot,
            services.debounce,
        );
        let export = Arc::new(ExportController::new(
            services.renderer,
            services.export_surface,
            services.overlay,
            services.downloads,
        ));

        Self {
            model,
            workspace,
            preview,
            export,
        }
    }

    /// Initial render.
    pub fn start(&self) {
        self.preview.schedule(true);
    }

    pub fn handle_message(&self, msg: Message) -> Handled {
        match msg {
            Message::ControlChanged(ThemeField::CustomOrderedBase, raw) => self.change_base(raw),
            Message::ControlChanged(field, value) => {
                self.workspace.lock().controls.set(field, ControlValue::Text(value));
                self.changed()
            }
            Message::ToggleChanged(field, checked) => self.toggle(field, checked),
            Message::CustomBulletsToggled(checked) => self.toggle(ThemeField::UseCustomBullets, checked),
            Message::CustomOrderedToggled(checked) => self.toggle(ThemeField::UseCustomOrdered, checked),
            Message::MarkdownChanged(text) => {
                self.workspace.lock().markdown = text;
                self.changed()
            }

            Message::BaseInput(raw) => self.change_base(raw),
            Message::DigitEdited(index, value) => {
                if !self.workspace.lock().ordered.set_value(index, value) {
                    return Handled::Ignored;
                }
                self.changed()
            }
            Message::DigitFocused(index) => {
                self.workspace.lock().ordered.focus(index);
                Handled::Ignored
            }

            Message::BulletEdited(id, value) => {
                let updated = {
                    let mut ws = self.workspace.lock();
                    !ws.bullets.is_disabled() && ws.bullets.set_value(id, value)
                };
                if !updated {
                    return Handled::Ignored;
                }
                self.changed()
            }
            Message::BulletAdded(value) => {
                {
                    let mut ws = self.workspace.lock();
                    if ws.bullets.is_disabled() {
                        return Handled::Ignored;
                    }
                    ws.bullets.add_row(value.unwrap_or_default());
                }
                self.changed()
            }
            Message::BulletRemoved(id) => {
                if !self.workspace.lock().bullets.remove_row(id) {
                    return Handled::Ignored;
                }
                self.changed()
            }

            Message::Reset => {
                {
                    let mut guard = self.workspace.lock();
                    let ws = &mut *guard;
                    self.model.reset(ws.controls.as_mut(), &mut ws.bullets, &mut ws.ordered);
                }
                self.preview.schedule(true);
                Handled::PreviewScheduled
            }
            Message::ExportRequested => {
                let request = self.snapshot();
                let export = Arc::clone(&self.export);
                Handled::ExportStarted(tokio::spawn(async move { export.export(request).await }))
            }
        }
    }

    fn changed(&self) -> Handled {
        self.preview.schedule(false);
        Handled::PreviewScheduled
    }

    fn toggle(&self, field: ThemeField, checked: bool) -> Handled {
        {
            let mut ws = self.workspace.lock();
            ws.controls.set(field, ControlValue::Checked(checked));
            if field == ThemeField::UseCustomBullets {
                ws.bullets.set_disabled(!checked);
            }
        }
        self.changed()
    }

    fn change_base(&self, raw: String) -> Handled {
        {
            let mut ws = self.workspace.lock();
            ws.ordered.change_base(&raw);
            ws.controls.set(ThemeField::CustomOrderedBase, ControlValue::Text(raw));
        }
        self.changed()
    }

    /// Send a preview right away, skipping the debounce.
    pub fn preview_now(&self) -> InFlight {
        self.preview.dispatch()
    }

    pub async fn export(&self) -> ExportOutcome {
        self.export.export(self.snapshot()).await
    }

    /// Current markdown plus a freshly gathered theme.
    pub fn snapshot(&self) -> PreviewRequest {
        snapshot_of(&self.model, &self.workspace)
    }

    pub fn theme(&self) -> Theme {
        self.snapshot().theme
    }

    pub fn markdown(&self) -> String {
        self.workspace.lock().markdown.clone()
    }

    pub fn control(&self, field: ThemeField) -> ControlValue {
        self.workspace.lock().controls.get(field)
    }

    pub fn bullet_rows(&self) -> Vec<BulletRow> {
        self.workspace.lock().bullets.rows().to_vec()
    }

    pub fn bullets_disabled(&self) -> bool {
        self.workspace.lock().bullets.is_disabled()
    }

    pub fn digit_rows(&self) -> Vec<DigitRow> {
        self.workspace.lock().ordered.rows().to_vec()
    }

    pub fn focused_digit(&self) -> Option<usize> {
        self.workspace.lock().ordered.focused()
    }

    pub fn preview_phase(&self) -> SyncPhase {
        self.preview.phase()
    }

    pub fn is_exporting(&self) -> bool {
        self.export.is_busy()
    }
}
