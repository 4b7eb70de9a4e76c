//! The processor model.
//!
//! Two implementations of one instruction set:
//! - the microcoded engine, which executes control words cycle by cycle
//!   through the shared bus
//! - the direct interpreter, a flat dispatch used as a cross-check oracle
//!
//! Plus the parts they are built from: the register file, the 256-byte
//! memory, the single-driver bus and the instruction codec.

pub mod bus;
pub mod decode;
pub mod engine;
pub mod interp;
pub mod memory;
pub mod registers;
pub mod snapshot;

pub use bus::{Bus, BusConflict};
pub use decode::{decode, encode, DecodeError, EncodeError, Instruction};
pub use engine::{Cpu, CpuError, CpuState};
pub use interp::{ArchState, Interp};
pub use memory::{Memory, MemoryError, MEMORY_SIZE};
pub use registers::{Registers, RESET_VECTOR};
