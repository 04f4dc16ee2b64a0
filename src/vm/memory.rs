//! Intcode memory subsystem.
//!
//! Memory is an unbounded array of signed 64-bit cells, zero until written.
//! Low addresses (where programs and their scratch space live) are kept in a
//! contiguous buffer that grows lazily on write. Addresses past
//! [`DENSE_LIMIT`] go to a sparse map so a stray far-away write cannot force a
//! giant allocation.

use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Addresses below this are stored densely.
pub const DENSE_LIMIT: usize = 1 << 20;

/// Intcode memory: default-zero cells addressed by non-negative integers.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<i64>,
    sparse: BTreeMap<usize, i64>,
}

impl Memory {
    /// Create an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create memory holding `image` starting at address 0.
    ///
    /// Any part of the image past [`DENSE_LIMIT`] goes to the sparse map.
    pub fn from_image(image: &[i64]) -> Self {
        let split = image.len().min(DENSE_LIMIT);
        let (dense, tail) = image.split_at(split);
        Self {
            cells: dense.to_vec(),
            sparse: tail
                .iter()
                .enumerate()
                .filter(|(_, value)| **value != 0)
                .map(|(i, &value)| (DENSE_LIMIT + i, value))
                .collect(),
        }
    }

    /// Read a cell. Cells never written read as zero.
    #[inline]
    pub fn read(&self, addr: i64) -> Result<i64, MemoryError> {
        Ok(self.cell(Self::index(addr)?))
    }

    fn cell(&self, index: usize) -> i64 {
        if index < DENSE_LIMIT {
            self.cells.get(index).copied().unwrap_or(0)
        } else {
            self.sparse.get(&index).copied().unwrap_or(0)
        }
    }

    /// Write a cell, growing memory as needed.
    #[inline]
    pub fn write(&mut self, addr: i64, value: i64) -> Result<(), MemoryError> {
        let index = Self::index(addr)?;
        if index < DENSE_LIMIT {
            if index >= self.cells.len() {
                self.cells.resize(index + 1, 0);
            }
            self.cells[index] = value;
        } else {
            self.sparse.insert(index, value);
        }
        Ok(())
    }

    fn index(addr: i64) -> Result<usize, MemoryError> {
        usize::try_from(addr).map_err(|_| MemoryError::InvalidAddress(addr))
    }

    /// One past the highest materialised address.
    pub fn len(&self) -> usize {
        match self.sparse.keys().next_back() {
            Some(&last) => last + 1,
            None => self.cells.len(),
        }
    }

    /// True if nothing was ever loaded or written.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.sparse.is_empty()
    }

    /// The densely stored prefix of memory.
    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }

    /// Dump `count` cells starting at `start` (for debugging).
    pub fn dump(&self, start: usize, count: usize) -> Vec<(usize, i64)> {
        (start..start.saturating_add(count))
            .map(|i| (i, self.cell(i)))
            .collect()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let non_zero = self.cells.iter().filter(|&&c| c != 0).count()
            + self.sparse.values().filter(|&&c| c != 0).count();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("dense_cells", &self.cells.len())
            .field("sparse_cells", &self.sparse.len())
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("invalid memory address {0}")]
    InvalidAddress(i64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unwritten_reads_zero() {
        let mem = Memory::new();
        assert_eq!(mem.read(0), Ok(0));
        assert_eq!(mem.read(12345), Ok(0));
        assert!(mem.is_empty());
    }

    #[test]
    fn test_read_does_not_grow() {
        let mem = Memory::from_image(&[1, 2, 3]);
        assert_eq!(mem.read(500), Ok(0));
        assert_eq!(mem.len(), 3);
    }

    #[test]
    fn test_write_grows_lazily() {
        let mut mem = Memory::from_image(&[7]);
        mem.write(10, 42).unwrap();
        assert_eq!(mem.len(), 11);
        assert_eq!(mem.read(0), Ok(7));
        assert_eq!(mem.read(5), Ok(0));
        assert_eq!(mem.read(10), Ok(42));
    }

    #[test]
    fn test_far_address_is_sparse() {
        let mut mem = Memory::new();
        let far = (DENSE_LIMIT as i64) * 1000;
        mem.write(far, -9).unwrap();
        assert_eq!(mem.read(far), Ok(-9));
        assert!(mem.as_slice().is_empty());
        assert_eq!(mem.len(), far as usize + 1);
    }

    #[test]
    fn test_image_past_dense_limit() {
        let mut image = vec![0; DENSE_LIMIT + 2];
        image[DENSE_LIMIT - 1] = 5;
        image[DENSE_LIMIT + 1] = 77;
        let mem = Memory::from_image(&image);

        assert_eq!(mem.read(DENSE_LIMIT as i64 - 1), Ok(5));
        assert_eq!(mem.read(DENSE_LIMIT as i64), Ok(0));
        assert_eq!(mem.read(DENSE_LIMIT as i64 + 1), Ok(77));
        assert_eq!(mem.dump(DENSE_LIMIT + 1, 1), vec![(DENSE_LIMIT + 1, 77)]);
        assert_eq!(mem.as_slice().len(), DENSE_LIMIT);
    }

    #[test]
    fn test_negative_address() {
        let mut mem = Memory::new();
        assert_eq!(mem.read(-1), Err(MemoryError::InvalidAddress(-1)));
        assert_eq!(mem.write(-5, 1), Err(MemoryError::InvalidAddress(-5)));
    }

    #[test]
    fn test_dump() {
        let mem = Memory::from_image(&[4, 5]);
        assert_eq!(mem.dump(1, 3), vec![(1, 5), (2, 0), (3, 0)]);
    }

    proptest! {
        #[test]
        fn read_after_write(addr in 0i64..4 * DENSE_LIMIT as i64, value in any::<i64>()) {
            let mut mem = Memory::from_image(&[1, 2, 3]);
            mem.write(addr, value).unwrap();
            prop_assert_eq!(mem.read(addr), Ok(value));
        }
    }
}
