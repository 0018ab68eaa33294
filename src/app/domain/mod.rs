//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Theme snapshot and persisted defaults
//! - Control bindings the theme is read through
//! - Preview/export wire payloads
//! - Message types for the event system

pub mod controls;
pub mod messages;
pub mod payload;
pub mod theme;

pub use controls::{ControlBindings, ControlValue, InMemoryControls, ThemeField};
pub use messages::{Message, RowId};
pub use payload::{ErrorBody, PreviewRequest, PreviewResponse};
pub use theme::{BulletConfig, OrderedConfig, Theme, ThemeDefaults, PRODUCT_NAME};
