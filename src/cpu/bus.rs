//! The shared single-driver bus.
//!
//! The bus is a transient slot: it carries at most one value per phase.
//! Asserting a second value in the same phase is a conflict, the hardware
//! equivalent of two drivers fighting, and aborts the step.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The bus. Released (floating) between phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bus {
    value: Option<u8>,
}

impl Bus {
    /// Create a floating bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the bus to the floating state.
    #[inline]
    pub fn release(&mut self) {
        self.value = None;
    }

    /// Drive a value onto the bus.
    ///
    /// Fails if another driver already asserted a value this phase.
    pub fn assert(&mut self, value: u8) -> Result<(), BusConflict> {
        if self.value.is_some() {
            return Err(BusConflict);
        }
        self.value = Some(value);
        Ok(())
    }

    /// Read the bus: the asserted value, or `None` if floating.
    #[inline]
    pub fn read(&self) -> Option<u8> {
        self.value
    }
}

/// Two drivers asserted the bus in the same phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("more than one driver asserted the bus in the same phase")]
pub struct BusConflict;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_assert() {
        let mut bus = Bus::new();
        assert_eq!(bus.read(), None);
        bus.assert(0x42).unwrap();
        assert_eq!(bus.read(), Some(0x42));
    }

    #[test]
    fn test_double_assert_conflicts() {
        let mut bus = Bus::new();
        bus.assert(1).unwrap();
        assert_eq!(bus.assert(2), Err(BusConflict));
        // The first value survives the failed assert.
        assert_eq!(bus.read(), Some(1));
    }

    #[test]
    fn test_release() {
        let mut bus = Bus::new();
        bus.assert(7).unwrap();
        bus.release();
        assert_eq!(bus.read(), None);
        bus.assert(8).unwrap();
        assert_eq!(bus.read(), Some(8));
    }
}
