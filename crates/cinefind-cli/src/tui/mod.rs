//! TUI module for the interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering.

mod browser;
/// Page selector layout.
pub mod pager;
/// Browser state types.
pub mod state;
mod ui;

pub use browser::run_browser;
