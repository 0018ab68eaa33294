//! Infrastructure layer - error types and the surfaces controllers render into.

pub mod error;
pub mod surface;
