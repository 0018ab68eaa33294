//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Theme, controls, Messages, wire payloads)
//! - `controllers/` - Orchestration (sequence editors, ThemeModel, preview, export)
//! - `services/` - External operations (render client, downloads)
//! - `infrastructure/` - Error types and surface capabilities
//! - `settings.rs` - Persisted client settings
//! - `state.rs` - Main session coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod settings;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenient external access
pub use controllers::export::ExportOutcome;
pub use controllers::preview::{PreviewOutcome, SyncPhase};
pub use domain::{ControlBindings, ControlValue, InMemoryControls, Message, Theme, ThemeDefaults, ThemeField};
pub use infrastructure::error::{AppError, RenderError};
pub use settings::ClientSettings;
pub use state::{EditorSession, Handled, SessionServices};
