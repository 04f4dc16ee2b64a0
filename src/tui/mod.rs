//! TUI viewer for the Intcode arcade.
//!
//! Provides an interactive terminal view with:
//! - Live game screen with colored tiles
//! - VM register and I/O panel
//! - Step/run/pause/reset controls

mod app;
mod ui;

pub use app::{ViewerApp, run_viewer};
