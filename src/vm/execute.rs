//! Intcode execution engine.
//!
//! Implements the decode-resolve-execute-advance cycle and the three ways a
//! controller can drive the machine: one instruction at a time, to halt, or
//! until the next output value.

use crate::vm::{IoChannel, Memory};
use crate::vm::decode::{self, DecodeError, Instruction, Mode, Opcode, Role};
use crate::vm::memory::MemoryError;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// VM execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VmState {
    /// VM can execute instructions.
    Running,
    /// VM executed a halt instruction.
    Halted,
    /// VM stopped on an error.
    Faulted,
}

/// Result of [`Vm::run_until_output`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A new value was appended to the output sequence.
    Output(i64),
    /// The VM halted without producing a new value.
    Halted,
}

impl Outcome {
    /// The produced value, if any.
    pub fn output(self) -> Option<i64> {
        match self {
            Outcome::Output(value) => Some(value),
            Outcome::Halted => None,
        }
    }
}

/// An Intcode virtual machine.
///
/// The VM owns its memory, registers and I/O channel outright. It is driven
/// from a single thread of control; between calls the controller may change
/// the pending input or inspect outputs.
#[derive(Clone, Serialize, Deserialize)]
pub struct Vm {
    mem: Memory,
    io: IoChannel,
    pc: i64,
    relative_base: i64,
    state: VmState,
    steps: u64,
    last_instr: Option<Instruction>,
}

impl Vm {
    /// Create a VM over an initial memory image with an optional pending input.
    pub fn new(image: &[i64], input: Option<i64>) -> Self {
        Self {
            mem: Memory::from_image(image),
            io: IoChannel::new(input),
            pc: 0,
            relative_base: 0,
            state: VmState::Running,
            steps: 0,
            last_instr: None,
        }
    }

    /// Execute a single instruction.
    ///
    /// Returns the instruction that was executed. Any error leaves the VM
    /// faulted.
    pub fn step(&mut self) -> Result<Instruction, VmError> {
        if self.state != VmState::Running {
            return Err(VmError::NotRunning(self.state));
        }

        match self.execute_next() {
            Ok(instr) => {
                self.steps += 1;
                self.last_instr = Some(instr);
                Ok(instr)
            }
            Err(e) => {
                warn!(pc = self.pc, error = %e, "vm faulted");
                self.state = VmState::Faulted;
                Err(e)
            }
        }
    }

    /// Run until halt or error.
    ///
    /// Returns the number of instructions executed.
    pub fn run(&mut self) -> Result<u64, VmError> {
        if self.state == VmState::Faulted {
            return Err(VmError::NotRunning(self.state));
        }
        let start_steps = self.steps;

        while self.state == VmState::Running {
            self.step()?;
        }

        Ok(self.steps - start_steps)
    }

    /// Run until exactly one new output is produced or the VM halts.
    pub fn run_until_output(&mut self) -> Result<Outcome, VmError> {
        let seen = self.io.outputs().len();

        loop {
            if self.state == VmState::Halted {
                return Ok(Outcome::Halted);
            }
            self.step()?;
            if let Some(&value) = self.io.outputs().get(seen) {
                return Ok(Outcome::Output(value));
            }
        }
    }

    fn execute_next(&mut self) -> Result<Instruction, VmError> {
        let pc = self.pc;
        let instr = decode::decode(self.mem.read(pc)?)?;
        trace!(pc, relative_base = self.relative_base, ?instr, "step");

        match instr.opcode {
            Opcode::Add => {
                let (a, b) = (self.load(&instr, 0)?, self.load(&instr, 1)?);
                self.store(&instr, 2, a.checked_add(b).ok_or(VmError::Overflow)?)?;
            }

            Opcode::Mul => {
                let (a, b) = (self.load(&instr, 0)?, self.load(&instr, 1)?);
                self.store(&instr, 2, a.checked_mul(b).ok_or(VmError::Overflow)?)?;
            }

            Opcode::Input => {
                let value = self.io.input().ok_or(VmError::MissingInput { pc })?;
                self.store(&instr, 0, value)?;
            }

            Opcode::Output => {
                let value = self.load(&instr, 0)?;
                debug!(pc, value, "output");
                self.io.emit(value);
            }

            Opcode::JumpIfTrue | Opcode::JumpIfFalse => {
                let (cond, target) = (self.load(&instr, 0)?, self.load(&instr, 1)?);
                let taken = (cond != 0) == (instr.opcode == Opcode::JumpIfTrue);
                self.pc = if taken { target } else { self.next_pc(&instr)? };
            }

            Opcode::LessThan => {
                let (a, b) = (self.load(&instr, 0)?, self.load(&instr, 1)?);
                self.store(&instr, 2, (a < b) as i64)?;
            }

            Opcode::Equals => {
                let (a, b) = (self.load(&instr, 0)?, self.load(&instr, 1)?);
                self.store(&instr, 2, (a == b) as i64)?;
            }

            Opcode::AdjustRelativeBase => {
                let delta = self.load(&instr, 0)?;
                self.relative_base = self.relative_base
                    .checked_add(delta)
                    .ok_or(VmError::Overflow)?;
                debug!(pc, relative_base = self.relative_base, "relative base adjusted");
            }

            Opcode::Halt => {
                self.state = VmState::Halted;
                debug!(pc, steps = self.steps + 1, "halted");
            }
        }

        if !instr.opcode.manages_pc() {
            self.pc = self.next_pc(&instr)?;
        }

        Ok(instr)
    }

    fn next_pc(&self, instr: &Instruction) -> Result<i64, VmError> {
        self.pc
            .checked_add(instr.width() as i64)
            .ok_or(VmError::Overflow)
    }

    /// Raw operand `index` of the instruction at PC.
    fn operand(&self, index: usize) -> Result<i64, VmError> {
        let addr = self.pc
            .checked_add(1 + index as i64)
            .ok_or(VmError::Overflow)?;
        Ok(self.mem.read(addr)?)
    }

    fn relative(&self, offset: i64) -> Result<i64, VmError> {
        offset.checked_add(self.relative_base).ok_or(VmError::Overflow)
    }

    /// Resolve an input parameter to its value.
    fn load(&self, instr: &Instruction, index: usize) -> Result<i64, VmError> {
        let raw = self.operand(index)?;
        match instr.mode(index)? {
            Mode::Position => Ok(self.mem.read(raw)?),
            Mode::Immediate => Ok(raw),
            Mode::Relative => Ok(self.mem.read(self.relative(raw)?)?),
        }
    }

    /// Resolve an output parameter to its address and write `value` there.
    fn store(&mut self, instr: &Instruction, index: usize, value: i64) -> Result<(), VmError> {
        let raw = self.operand(index)?;
        let addr = match instr.mode(index)? {
            Mode::Position => raw,
            Mode::Relative => self.relative(raw)?,
            Mode::Immediate => {
                return Err(DecodeError::InvalidAddressingMode { mode: 1, role: Role::Out }.into())
            }
        };
        self.mem.write(addr, value)?;
        Ok(())
    }

    /// Replace the pending input read by the next input instruction.
    pub fn set_input(&mut self, value: i64) {
        self.io.set_input(value);
    }

    /// Empty the pending-input register.
    pub fn clear_input(&mut self) {
        self.io.clear_input();
    }

    /// Current value of the pending-input register.
    pub fn input(&self) -> Option<i64> {
        self.io.input()
    }

    /// Every value output so far, oldest first.
    pub fn outputs(&self) -> &[i64] {
        self.io.outputs()
    }

    /// The most recent output, if any.
    pub fn last_output(&self) -> Option<i64> {
        self.io.last_output()
    }

    /// Get the VM's memory.
    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    /// Mutable memory access, for controllers that patch the image.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    /// Get the program counter.
    pub fn pc(&self) -> i64 {
        self.pc
    }

    /// Get the relative base register.
    pub fn relative_base(&self) -> i64 {
        self.relative_base
    }

    /// Get the execution state.
    pub fn state(&self) -> VmState {
        self.state
    }

    /// Number of instructions executed.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Get the last executed instruction.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last_instr
    }

    /// Check if the VM has halted.
    pub fn is_halted(&self) -> bool {
        self.state == VmState::Halted
    }

    /// Check if the VM can still execute instructions.
    pub fn is_running(&self) -> bool {
        self.state == VmState::Running
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new(&[], None)
    }
}

impl std::fmt::Debug for Vm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vm")
            .field("state", &self.state)
            .field("pc", &self.pc)
            .field("relative_base", &self.relative_base)
            .field("steps", &self.steps)
            .field("outputs", &self.io.outputs().len())
            .field("mem", &self.mem)
            .finish()
    }
}

/// Errors that can occur during VM execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("VM not running: {0:?}")]
    NotRunning(VmState),

    #[error("memory error: {0}")]
    MemoryError(#[from] MemoryError),

    #[error("decode error: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("input instruction at {pc} with no pending input")]
    MissingInput { pc: i64 },

    #[error("arithmetic overflow")]
    Overflow,
}
