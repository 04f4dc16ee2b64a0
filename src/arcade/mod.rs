//! Breakout arcade built on the Intcode VM.
//!
//! The VM knows nothing about games. This module layers the arcade output
//! protocol, the paddle-tracking joystick policy and screen rendering on
//! top of [`Vm::run_until_output`](crate::vm::Vm::run_until_output).

pub mod screen;
pub mod cabinet;
pub mod render;

pub use screen::{Screen, Tile};
pub use cabinet::{Arcade, Event, Joystick, QUARTERS};
pub use render::{Renderer, NullRenderer, TextRenderer};

use crate::vm::VmError;
use thiserror::Error;

/// Errors that can occur while running the arcade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArcadeError {
    #[error("VM error: {0}")]
    VmError(#[from] VmError),

    #[error("unknown tile id {0}")]
    UnknownTile(i64),

    #[error("render error: {0}")]
    RenderError(String),
}
