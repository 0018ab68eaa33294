//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the surfaces:
//! - Ordered digit table and bullet sequence editors
//! - Theme gathering and reset
//! - Debounced preview synchronization
//! - PDF export

pub mod bullets;
pub mod export;
pub mod ordered;
pub mod preview;
pub mod theme_model;
