//! Intcode virtual machine.
//!
//! This module implements the complete Intcode machine:
//! - unbounded, default-zero memory of 64-bit cells
//! - position, immediate and relative addressing
//! - a fixed ten-opcode instruction set
//! - a pending-input register and an append-only output sequence

pub mod memory;
pub mod decode;
pub mod io;
pub mod execute;

pub use memory::{Memory, MemoryError};
pub use decode::{Instruction, Mode, Opcode, Role, DecodeError};
pub use io::IoChannel;
pub use execute::{Vm, VmError, VmState, Outcome};
