//! Headless surfaces the CLI renders into.

pub mod console;
pub mod preview_page;
