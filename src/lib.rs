//! # Intcode VM
//!
//! An interpreter for Intcode, a small self-modifying register/memory
//! machine with unbounded memory, three addressing modes and a
//! non-blocking I/O model.
//!
//! The VM is driven by a controller one instruction, one output, or one
//! whole run at a time. The [`arcade`] module is such a controller: it
//! plays a breakout game whose program runs on the VM.

pub mod vm;
pub mod asm;
pub mod arcade;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use vm::{Vm, VmState, VmError, Outcome, Memory, Instruction, Opcode};
pub use asm::{parse_program, load_program, disassemble, ProgramError};
pub use arcade::{Arcade, ArcadeError, Screen, Tile, Renderer, TextRenderer};

#[cfg(feature = "tui")]
pub use tui::run_viewer;
