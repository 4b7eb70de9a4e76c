//! Micro-signal vocabulary and control store.
//!
//! The control store is the machine's microcode: a precomputed table of
//! control words indexed by `(carry, opcode, cycle)`. It is generated once
//! from a declarative ISA table and never mutated afterwards.

pub mod isa;
pub mod store;
pub mod word;

pub use isa::{canonical_isa, CarryCond, CycleDef, MicroProgram};
pub use store::{ControlStore, StoreError};
pub use word::ControlWord;
