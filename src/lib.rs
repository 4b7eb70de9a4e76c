//! # micro181
//!
//! A cycle-accurate emulator of a small microcoded 8-bit processor: a
//! register file, a 74181-style ALU, a shared single-driver bus and a
//! control store that sequences multi-cycle instruction execution through
//! explicit clock phases.
//!
//! Two implementations of the instruction set run side by side: the
//! microcoded engine ([`Cpu`]) and a direct interpreter ([`Interp`]) that
//! serves as its cross-check oracle.
//!
//! ```
//! use micro181::{canonical_isa, Assembler, ControlStore, Cpu, RESET_VECTOR};
//!
//! let store = ControlStore::build(&canonical_isa()).unwrap();
//!
//! let mut asm = Assembler::new();
//! asm.imm(2).unwrap();
//! asm.a2b().unwrap();
//! asm.imm(3).unwrap();
//! asm.add().unwrap();
//! asm.halt().unwrap();
//!
//! let mut cpu = Cpu::new();
//! cpu.mem.load_image(0, asm.image()).unwrap();
//! cpu.run(&store).unwrap();
//! assert_eq!(cpu.regs.a, 5);
//! assert_eq!(cpu.regs.pc, RESET_VECTOR + 4);
//! ```

pub mod alu;
pub mod asm;
pub mod control;
pub mod cpu;

// Re-export commonly used types
pub use asm::{disassemble, Assembler, AssemblerError};
pub use control::{canonical_isa, CarryCond, ControlStore, ControlWord, MicroProgram, StoreError};
pub use cpu::{
    decode, encode, ArchState, Cpu, CpuError, CpuState, Instruction, Interp, Memory, Registers,
    RESET_VECTOR,
};
