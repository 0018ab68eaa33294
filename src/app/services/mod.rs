//! Services layer - talking to the outside world.
//!
//! - Render service client (preview and PDF endpoints)
//! - Download naming and saving

pub mod download;
pub mod render_client;
