//! Disassembler for Intcode programs.
//!
//! Intcode code and data share memory, so a listing is only a best guess:
//! cells that do not decode are shown as `DATA`.

use crate::vm::{Memory, Mode};
use crate::vm::decode::decode;

/// Disassemble the instruction at `addr`.
///
/// Returns the text and the number of cells it covers.
pub fn disassemble_instruction(mem: &Memory, addr: usize) -> (String, usize) {
    let raw = mem.read(addr as i64).unwrap_or(0);
    let instr = match decode(raw) {
        Ok(instr) => instr,
        Err(_) => return (format!("DATA {}", raw), 1),
    };

    let mut operands = Vec::new();
    for index in 0..instr.opcode.params().len() {
        let param = mem.read((addr + 1 + index) as i64).unwrap_or(0);
        match instr.mode(index) {
            Ok(mode) => operands.push(format_operand(param, mode)),
            Err(_) => return (format!("DATA {}", raw), 1),
        }
    }

    let text = if operands.is_empty() {
        instr.opcode.mnemonic().to_string()
    } else {
        format!("{:<4}{}", instr.opcode.mnemonic(), operands.join(", "))
    };
    (text, instr.width())
}

/// Disassemble a whole memory image.
pub fn disassemble(image: &[i64]) -> String {
    let mem = Memory::from_image(image);
    let mut output = String::new();
    output.push_str("; Intcode Disassembly\n");
    output.push_str("; -------------------\n\n");

    let mut addr = 0;
    while addr < image.len() {
        let (text, width) = disassemble_instruction(&mem, addr);
        let end = (addr + width).min(image.len());
        let cells: Vec<String> = image[addr..end].iter().map(i64::to_string).collect();
        output.push_str(&format!("{:05}: {:<24} ; {}\n", addr, text, cells.join(",")));
        addr += width;
    }

    output
}

/// Format an operand according to its addressing mode.
fn format_operand(param: i64, mode: Mode) -> String {
    match mode {
        Mode::Position => format!("[{}]", param),
        Mode::Immediate => format!("{}", param),
        Mode::Relative if param < 0 => format!("[rb-{}]", param.unsigned_abs()),
        Mode::Relative => format!("[rb+{}]", param),
    }
}
