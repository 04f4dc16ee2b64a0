//! The VM's I/O channel.
//!
//! Input is a single register that the input instruction reads without
//! consuming; it never blocks and never queues. Feeding a different value
//! for each read is up to whoever drives the VM. Output is an append-only
//! sequence.

use serde::{Serialize, Deserialize};

/// Pending-input register plus output sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoChannel {
    input: Option<i64>,
    outputs: Vec<i64>,
}

impl IoChannel {
    /// Create a channel with an optional pending input and no outputs.
    pub fn new(input: Option<i64>) -> Self {
        Self {
            input,
            outputs: Vec::new(),
        }
    }

    /// Current value of the pending-input register.
    pub fn input(&self) -> Option<i64> {
        self.input
    }

    /// Replace the pending input.
    pub fn set_input(&mut self, value: i64) {
        self.input = Some(value);
    }

    /// Empty the pending-input register.
    pub fn clear_input(&mut self) {
        self.input = None;
    }

    /// Append a value to the output sequence.
    pub fn emit(&mut self, value: i64) {
        self.outputs.push(value);
    }

    /// Every value output so far, oldest first.
    pub fn outputs(&self) -> &[i64] {
        &self.outputs
    }

    /// The most recent output, if any.
    pub fn last_output(&self) -> Option<i64> {
        self.outputs.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_is_not_consumed() {
        let mut io = IoChannel::new(Some(7));
        assert_eq!(io.input(), Some(7));
        assert_eq!(io.input(), Some(7));
        io.set_input(-1);
        assert_eq!(io.input(), Some(-1));
        io.clear_input();
        assert_eq!(io.input(), None);
    }

    #[test]
    fn test_outputs_append_in_order() {
        let mut io = IoChannel::default();
        assert_eq!(io.last_output(), None);
        io.emit(3);
        io.emit(1);
        io.emit(3);
        assert_eq!(io.outputs(), &[3, 1, 3]);
        assert_eq!(io.last_output(), Some(3));
    }
}
