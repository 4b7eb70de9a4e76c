//! The 256-byte memory.
//!
//! Addresses are `u8`, so every computed address wraps modulo 256 by
//! construction, mirroring the fixed-width address register of the
//! hardware. Out-of-range access cannot occur; only loading an oversized
//! program image is an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of addressable bytes.
pub const MEMORY_SIZE: usize = 256;

/// The addressable memory.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<u8>,
}

impl Memory {
    /// Create a memory with every cell zeroed.
    pub fn new() -> Self {
        Self {
            cells: vec![0; MEMORY_SIZE],
        }
    }

    /// Read the cell at `addr`.
    #[inline]
    pub fn read(&self, addr: u8) -> u8 {
        self.cells[addr as usize]
    }

    /// Write the cell at `addr`.
    #[inline]
    pub fn write(&mut self, addr: u8, value: u8) {
        self.cells[addr as usize] = value;
    }

    /// Clear all cells to zero.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Load a program image starting at `start`.
    ///
    /// The image must fit without running past the end of memory; images
    /// are placed, not wrapped.
    pub fn load_image(&mut self, start: u8, image: &[u8]) -> Result<(), MemoryError> {
        let start = start as usize;
        if start + image.len() > MEMORY_SIZE {
            return Err(MemoryError::ImageTooLarge {
                size: image.len(),
                available: MEMORY_SIZE - start,
            });
        }
        self.cells[start..start + image.len()].copy_from_slice(image);
        Ok(())
    }

    /// View the full 256-byte contents.
    pub fn contents(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let non_zero = self.cells.iter().filter(|&&c| c != 0).count();
        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}

/// Errors that can occur loading a program image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("image size {size} exceeds available space {available}")]
    ImageTooLarge { size: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let mut mem = Memory::new();
        mem.write(10, 42);
        assert_eq!(mem.read(10), 42);
        assert_eq!(mem.read(11), 0);
    }

    #[test]
    fn test_full_address_range() {
        let mut mem = Memory::new();
        mem.write(0x00, 1);
        mem.write(0xff, 2);
        assert_eq!(mem.read(0x00), 1);
        assert_eq!(mem.read(0xff), 2);
    }

    #[test]
    fn test_load_image() {
        let mut mem = Memory::new();
        mem.load_image(0x10, &[1, 2, 3]).unwrap();
        assert_eq!(mem.read(0x10), 1);
        assert_eq!(mem.read(0x11), 2);
        assert_eq!(mem.read(0x12), 3);
    }

    #[test]
    fn test_load_image_too_large() {
        let mut mem = Memory::new();
        let image = vec![0xaa; 20];
        assert!(mem.load_image(0xf0, &image).is_err());
        // A snug fit is fine.
        assert!(mem.load_image(0xf0, &image[..16]).is_ok());
    }

    #[test]
    fn test_clear() {
        let mut mem = Memory::new();
        mem.write(5, 99);
        mem.clear();
        assert_eq!(mem.read(5), 0);
    }
}
