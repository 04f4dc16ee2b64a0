//! WebAssembly bindings for the Intcode VM.
//!
//! This module provides JavaScript-friendly wrappers around the core VM.

use wasm_bindgen::prelude::*;
use crate::vm::Vm;
use crate::asm::{disassemble, parse_program};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly VM wrapper.
#[wasm_bindgen]
pub struct WasmVm {
    vm: Vm,
    program: Vec<i64>,
}

#[wasm_bindgen]
impl WasmVm {
    /// Create an empty VM.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            vm: Vm::default(),
            program: Vec::new(),
        }
    }

    /// Load a program listing. Returns its length in cells.
    #[wasm_bindgen]
    pub fn load(&mut self, source: &str) -> Result<usize, JsError> {
        let program = parse_program(source)
            .map_err(|e| JsError::new(&e.to_string()))?;

        self.vm = Vm::new(&program, None);
        self.program = program;
        Ok(self.program.len())
    }

    /// Reload the last loaded program.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.vm = Vm::new(&self.program, None);
    }

    #[wasm_bindgen]
    pub fn set_input(&mut self, value: i64) {
        self.vm.set_input(value);
    }

    /// Step one instruction. Returns its mnemonic.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<String, JsError> {
        let instr = self.vm.step()
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(instr.opcode.mnemonic().to_string())
    }

    /// Run until halt. Returns the number of instructions executed.
    #[wasm_bindgen]
    pub fn run(&mut self) -> Result<u64, JsError> {
        self.vm.run().map_err(|e| JsError::new(&e.to_string()))
    }

    /// Run until the next output. Returns `undefined` if the VM halted first.
    #[wasm_bindgen]
    pub fn run_until_output(&mut self) -> Result<Option<i64>, JsError> {
        let outcome = self.vm.run_until_output()
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(outcome.output())
    }

    #[wasm_bindgen]
    pub fn outputs(&self) -> Vec<i64> {
        self.vm.outputs().to_vec()
    }

    #[wasm_bindgen]
    pub fn is_halted(&self) -> bool {
        self.vm.is_halted()
    }

    #[wasm_bindgen]
    pub fn pc(&self) -> i64 {
        self.vm.pc()
    }

    #[wasm_bindgen]
    pub fn relative_base(&self) -> i64 {
        self.vm.relative_base()
    }

    #[wasm_bindgen]
    pub fn steps(&self) -> u64 {
        self.vm.steps()
    }

    /// Get `count` memory cells starting at `start`.
    #[wasm_bindgen]
    pub fn memory_range(&self, start: usize, count: usize) -> Vec<i64> {
        self.vm.memory()
            .dump(start, count)
            .into_iter()
            .map(|(_, value)| value)
            .collect()
    }

    /// Get the full VM state as JSON.
    #[wasm_bindgen]
    pub fn state_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.vm)
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

impl Default for WasmVm {
    fn default() -> Self {
        Self::new()
    }
}

/// Disassemble a program listing.
#[wasm_bindgen]
pub fn wasm_disassemble(source: &str) -> Result<String, JsError> {
    let program = parse_program(source)
        .map_err(|e| JsError::new(&e.to_string()))?;
    Ok(disassemble(&program))
}
