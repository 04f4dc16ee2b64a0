//! Instruction decoder for Intcode.
//!
//! An instruction cell packs the opcode into its two lowest decimal digits
//! and one addressing-mode digit per parameter above that:
//!
//! ```text
//!   ABCDE
//!    1002
//!   DE - opcode (02)
//!    C - mode of parameter 1
//!    B - mode of parameter 2
//!    A - mode of parameter 3 (leading zeros omitted)
//! ```

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// How an instruction uses a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The parameter supplies a value.
    In,
    /// The parameter names the address a result is written to.
    Out,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::In => write!(f, "input"),
            Role::Out => write!(f, "output"),
        }
    }
}

/// Parameter addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// The parameter is an address (mode 0).
    Position,
    /// The parameter is the value itself (mode 1).
    Immediate,
    /// The parameter is an offset from the relative base (mode 2).
    Relative,
}

impl Mode {
    /// Interpret a mode digit for a parameter with the given role.
    ///
    /// Output parameters name an address, so immediate mode is rejected.
    pub fn for_role(digit: u8, role: Role) -> Result<Self, DecodeError> {
        match (digit, role) {
            (0, _) => Ok(Mode::Position),
            (1, Role::In) => Ok(Mode::Immediate),
            (2, _) => Ok(Mode::Relative),
            _ => Err(DecodeError::InvalidAddressingMode { mode: digit, role }),
        }
    }
}

use Role::{In, Out};

/// The fixed Intcode instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// `out = in1 + in2`
    Add,
    /// `out = in1 * in2`
    Mul,
    /// `out = pending input`
    Input,
    /// Append `in1` to the output sequence.
    Output,
    /// Jump to `in2` if `in1 != 0`.
    JumpIfTrue,
    /// Jump to `in2` if `in1 == 0`.
    JumpIfFalse,
    /// `out = (in1 < in2) as i64`
    LessThan,
    /// `out = (in1 == in2) as i64`
    Equals,
    /// `relative_base += in1`
    AdjustRelativeBase,
    /// Stop the machine.
    Halt,
}

impl Opcode {
    pub const ALL: [Opcode; 10] = [
        Opcode::Add,
        Opcode::Mul,
        Opcode::Input,
        Opcode::Output,
        Opcode::JumpIfTrue,
        Opcode::JumpIfFalse,
        Opcode::LessThan,
        Opcode::Equals,
        Opcode::AdjustRelativeBase,
        Opcode::Halt,
    ];

    /// Look up an opcode by its numeric code.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            1 => Opcode::Add,
            2 => Opcode::Mul,
            3 => Opcode::Input,
            4 => Opcode::Output,
            5 => Opcode::JumpIfTrue,
            6 => Opcode::JumpIfFalse,
            7 => Opcode::LessThan,
            8 => Opcode::Equals,
            9 => Opcode::AdjustRelativeBase,
            99 => Opcode::Halt,
            _ => return None,
        })
    }

    /// The numeric code of this opcode.
    pub fn code(self) -> i64 {
        match self {
            Opcode::Add => 1,
            Opcode::Mul => 2,
            Opcode::Input => 3,
            Opcode::Output => 4,
            Opcode::JumpIfTrue => 5,
            Opcode::JumpIfFalse => 6,
            Opcode::LessThan => 7,
            Opcode::Equals => 8,
            Opcode::AdjustRelativeBase => 9,
            Opcode::Halt => 99,
        }
    }

    /// Parameter roles, in operand order.
    pub fn params(self) -> &'static [Role] {
        match self {
            Opcode::Add | Opcode::Mul | Opcode::LessThan | Opcode::Equals => &[In, In, Out],
            Opcode::Input => &[Out],
            Opcode::Output | Opcode::AdjustRelativeBase => &[In],
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => &[In, In],
            Opcode::Halt => &[],
        }
    }

    /// True if executing this opcode sets PC itself.
    pub fn manages_pc(self) -> bool {
        matches!(self, Opcode::JumpIfTrue | Opcode::JumpIfFalse | Opcode::Halt)
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Mul => "MUL",
            Opcode::Input => "IN",
            Opcode::Output => "OUT",
            Opcode::JumpIfTrue => "JNZ",
            Opcode::JumpIfFalse => "JZ",
            Opcode::LessThan => "LT",
            Opcode::Equals => "EQ",
            Opcode::AdjustRelativeBase => "ARB",
            Opcode::Halt => "HLT",
        }
    }
}

/// A decoded instruction cell.
///
/// Mode digits are kept raw; they are validated against each parameter's
/// role when the parameter is resolved, so digits in unused slots are
/// never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub modes: [u8; 3],
}

impl Instruction {
    /// Number of cells this instruction occupies, including itself.
    pub fn width(&self) -> usize {
        1 + self.opcode.params().len()
    }

    /// Resolve the mode of parameter `index` (0-based).
    pub fn mode(&self, index: usize) -> Result<Mode, DecodeError> {
        let role = self.opcode.params().get(index).copied().ok_or(
            DecodeError::NoSuchParameter { opcode: self.opcode.code(), index },
        )?;
        Mode::for_role(self.modes[index], role)
    }
}

/// Decode an instruction cell.
pub fn decode(cell: i64) -> Result<Instruction, DecodeError> {
    let code = cell.rem_euclid(100);
    let opcode = Opcode::from_code(code).ok_or(DecodeError::UnknownOpcode(code))?;

    let digit = |k: u32| cell.div_euclid(10i64.pow(k + 1)).rem_euclid(10) as u8;
    let modes = [digit(1), digit(2), digit(3)];

    Ok(Instruction { opcode, modes })
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown opcode {0}")]
    UnknownOpcode(i64),

    #[error("invalid addressing mode {mode} for {role} parameter")]
    InvalidAddressingMode { mode: u8, role: Role },

    #[error("opcode {opcode} has no parameter {index}")]
    NoSuchParameter { opcode: i64, index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_halt() {
        let instr = decode(99).unwrap();
        assert_eq!(instr.opcode, Opcode::Halt);
        assert_eq!(instr.width(), 1);
        assert!(instr.opcode.manages_pc());
    }

    #[test]
    fn test_decode_modes() {
        let instr = decode(1002).unwrap();
        assert_eq!(instr.opcode, Opcode::Mul);
        assert_eq!(instr.modes, [0, 1, 0]);
        assert_eq!(instr.mode(0), Ok(Mode::Position));
        assert_eq!(instr.mode(1), Ok(Mode::Immediate));
        assert_eq!(instr.mode(2), Ok(Mode::Position));

        let instr = decode(21209).unwrap();
        assert_eq!(instr.opcode, Opcode::AdjustRelativeBase);
        assert_eq!(instr.modes, [2, 1, 2]);
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(decode(5000), Err(DecodeError::UnknownOpcode(0)));
        assert_eq!(decode(42), Err(DecodeError::UnknownOpcode(42)));
        assert_eq!(decode(98), Err(DecodeError::UnknownOpcode(98)));
    }

    #[test]
    fn test_immediate_output_rejected() {
        let instr = decode(11101).unwrap();
        assert_eq!(instr.mode(0), Ok(Mode::Immediate));
        assert_eq!(
            instr.mode(2),
            Err(DecodeError::InvalidAddressingMode { mode: 1, role: Role::Out })
        );
    }

    #[test]
    fn test_out_of_range_mode_digit() {
        let instr = decode(304).unwrap();
        assert_eq!(
            instr.mode(0),
            Err(DecodeError::InvalidAddressingMode { mode: 3, role: Role::In })
        );
    }

    #[test]
    fn test_mode_of_unused_slot() {
        let halt = decode(99).unwrap();
        assert_eq!(
            halt.mode(0),
            Err(DecodeError::NoSuchParameter { opcode: 99, index: 0 })
        );

        let output = decode(104).unwrap();
        assert_eq!(output.mode(0), Ok(Mode::Immediate));
        assert_eq!(
            output.mode(1),
            Err(DecodeError::NoSuchParameter { opcode: 4, index: 1 })
        );
        assert!(output.mode(7).is_err());
    }

    #[test]
    fn test_code_table_consistent() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_code(op.code()), Some(op));
        }
    }

    proptest! {
        #[test]
        fn decodes_digits(op in prop::sample::select(Opcode::ALL.to_vec()),
                          m1 in 0u8..3, m2 in 0u8..3, m3 in 0u8..3) {
            let cell = op.code()
                + 100 * m1 as i64
                + 1000 * m2 as i64
                + 10000 * m3 as i64;
            let instr = decode(cell).unwrap();
            prop_assert_eq!(instr.opcode, op);
            prop_assert_eq!(instr.modes, [m1, m2, m3]);
        }
    }
}
