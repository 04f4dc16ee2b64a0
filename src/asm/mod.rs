//! Program listings and disassembly for Intcode.
//!
//! Provides:
//! - Listing loader/saver (comma-separated integers)
//! - Disassembler for memory images

pub mod program;
pub mod disasm;

pub use program::{parse_program, load_program, save_program, format_program, ProgramError};
pub use disasm::disassemble;
