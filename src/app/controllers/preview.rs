//! Debounced preview synchronization.
//!
//! A burst of edits collapses into one request once the input has been quiet
//! for the debounce period. Requests already sent are never aborted; each
//! carries a [`RequestToken`] and its response is applied only if that token
//! is still the latest one issued. The preview therefore always shows the
//! result of the most recently sent request, whatever order responses arrive in.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::app::domain::{PreviewRequest, PreviewResponse};
use crate::app::infrastructure::error::RenderError;
use crate::app::infrastructure::surface::{PreviewStatus, PreviewSurface};
use crate::app::services::render_client::RenderService;

/// Default quiet period before a preview request is sent.
pub const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(280);

/// Serial number of one issued preview request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn serial(&self) -> u64 {
        self.0
    }
}

/// Discard rule: a response is applied only if its request is the latest issued.
pub fn should_apply(token: RequestToken, latest: RequestToken) -> bool {
    token == latest
}

/// Monotonic source of request tokens.
#[derive(Debug, Default)]
pub struct SerialCounter {
    latest: AtomicU64,
}

impl SerialCounter {
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> RequestToken {
        RequestToken(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        should_apply(token, self.latest())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Scheduled,
    InFlight,
    Applied,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    Applied,
    Discarded,
    Failed(String),
}

/// Captures the markdown and a freshly gathered theme at send time.
pub type SnapshotFn = dyn Fn() -> PreviewRequest + Send + Sync;

/// A sent request. Dropping it does not cancel the request.
pub struct InFlight {
    pub token: RequestToken,
    handle: JoinHandle<PreviewOutcome>,
}

impl InFlight {
    pub async fn outcome(self) -> PreviewOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => PreviewOutcome::Failed(e.to_string()),
        }
    }
}

#[derive(Default)]
struct TimerSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

struct Shared {
    service: Arc<dyn RenderService>,
    surface: Arc<dyn PreviewSurface>,
    snapshot: Box<SnapshotFn>,
    serial: SerialCounter,
    timer: Mutex<TimerSlot>,
    phase: Mutex<SyncPhase>,
}

impl Shared {
    fn fire(self: &Arc<Self>) -> InFlight {
        let request = (self.snapshot)();
        let token = self.serial.issue();

        let timer_pending = self.timer.lock().handle.is_some();
        if !timer_pending {
            *self.phase.lock() = SyncPhase::InFlight;
        }
        self.surface.set_status(PreviewStatus::Rendering);
        log::debug!("Sending preview request #{}", token.serial());

        let shared = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let result = shared.service.preview(&request).await;
            shared.complete(token, &request, result)
        });
        InFlight { token, handle }
    }

    fn complete(
        &self,
        token: RequestToken,
        request: &PreviewRequest,
        result: Result<PreviewResponse, RenderError>,
    ) -> PreviewOutcome {
        if !self.serial.is_current(token) {
            log::debug!(
                "Discarding stale preview #{} (latest is #{})",
                token.serial(),
                self.serial.latest().serial()
            );
            return PreviewOutcome::Discarded;
        }

        match result {
            Ok(response) => {
                self.surface.apply(&response.html, &response.css);
                self.surface.set_document_title(&request.theme.display_title());
                self.surface.set_status(PreviewStatus::Updated);
                self.settle(SyncPhase::Applied);
                log::info!("Preview #{} applied", token.serial());
                PreviewOutcome::Applied
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("Preview #{} failed: {}", token.serial(), message);
                self.surface.set_status(PreviewStatus::Failed(message.clone()));
                self.settle(SyncPhase::Idle);
                PreviewOutcome::Failed(message)
            }
        }
    }

    /// A newer schedule keeps its own phase.
    fn settle(&self, next: SyncPhase) {
        let mut phase = self.phase.lock();
        if *phase == SyncPhase::InFlight {
            *phase = next;
        }
    }
}

pub struct PreviewSynchronizer {
    shared: Arc<Shared>,
    debounce: Duration,
}

impl PreviewSynchronizer {
    pub fn new(
        service: Arc<dyn RenderService>,
        surface: Arc<dyn PreviewSurface>,
        snapshot: Box<SnapshotFn>,
        debounce: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                service,
                surface,
                snapshot,
                serial: SerialCounter::default(),
                timer: Mutex::new(TimerSlot::default()),
                phase: Mutex::new(SyncPhase::Idle),
            }),
            debounce,
        }
    }

    /// Restart the debounce timer. `immediate` fires on the next tick instead.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, immediate: bool) {
        let delay = if immediate { Duration::ZERO } else { self.debounce };

        let mut slot = self.shared.timer.lock();
        if let Some(pending) = slot.handle.take() {
            pending.abort();
        }
        slot.generation += 1;
        let generation = slot.generation;

        let shared = Arc::clone(&self.shared);
        slot.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut slot = shared.timer.lock();
                // Superseded between waking and getting here.
                if slot.generation != generation {
                    return;
                }
                slot.handle = None;
            }
            shared.fire();
        }));
        // Set while the timer is held so the task cannot fire first.
        *self.shared.phase.lock() = SyncPhase::Scheduled;
        drop(slot);
    }

    /// Send a request right now, bypassing the debounce timer.
    pub fn dispatch(&self) -> InFlight {
        self.shared.fire()
    }

    /// Drop a pending timer without sending anything.
    pub fn cancel_pending(&self) {
        let mut slot = self.shared.timer.lock();
        if let Some(pending) = slot.handle.take() {
            pending.abort();
            slot.generation += 1;
            drop(slot);
            let mut phase = self.shared.phase.lock();
            if *phase == SyncPhase::Scheduled {
                *phase = SyncPhase::Idle;
            }
        }
    }

    pub fn phase(&self) -> SyncPhase {
        *self.shared.phase.lock()
    }

    pub fn latest_token(&self) -> RequestToken {
        self.shared.serial.latest()
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }
}

impl Drop for PreviewSynchronizer {
    fn drop(&mut self) {
        if let Some(pending) = self.shared.timer.lock().handle.take() {
            pending.abort();
        }
    }
}
