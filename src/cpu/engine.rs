//! The microcoded execution engine.
//!
//! Drives the clock-phase state machine: each instruction occupies up to
//! four cycle slots, and each cycle runs two ordered half-steps. First the
//! bus is asserted from the control word's source signals and the
//! falling-edge latches commit (address register, link register, carry
//! before A and B, data pointer, direct PC-in, memory write). Then the bus
//! is asserted again, because the ALU output may have moved after the carry
//! latched, and the rising-edge action commits: halt first, otherwise the
//! instruction-register latch and exactly one of PC-advance or PC-load.
//!
//! Two structural signals are injected rather than stored: cycle 0 always
//! latches PC into the address register and fetches the instruction
//! register, and cycle 1 always advances PC as part of the fetch overlap.

use crate::alu;
use crate::control::{ControlStore, ControlWord};
use crate::cpu::bus::{Bus, BusConflict};
use crate::cpu::memory::{Memory, MemoryError};
use crate::cpu::registers::Registers;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The clock-phase state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// About to run cycle 0 of the next instruction.
    Fetching,
    /// Executing the given work cycle (1..=3) of the current instruction.
    Executing(u8),
    /// The halt latch is set. Terminal: stepping is a no-op.
    Halted,
}

/// The microcoded CPU.
///
/// Owns its registers and memory exclusively; the control store is borrowed
/// per step so one generated store can serve many machines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    /// Register file.
    pub regs: Registers,
    /// Main memory, including the loaded program image.
    pub mem: Memory,
    /// Current execution state.
    pub state: CpuState,
    /// Clock cycles elapsed (for profiling and cycle-accuracy tests).
    pub cycles: u64,
    bus: Bus,
}

impl Cpu {
    /// Create a CPU in the reset state with zeroed memory.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            state: CpuState::Fetching,
            cycles: 0,
            bus: Bus::new(),
        }
    }

    /// Reset registers, state and cycle count. Memory is left intact so a
    /// loaded image can be re-run.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.state = CpuState::Fetching;
        self.cycles = 0;
        self.bus.release();
    }

    /// Load a program image at the given address.
    pub fn load_image(&mut self, start: u8, image: &[u8]) -> Result<(), MemoryError> {
        self.mem.load_image(start, image)
    }

    /// True once the halt latch is set.
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// Execute one clock cycle (both half-steps). No-op once halted.
    pub fn step_cycle(&mut self, store: &ControlStore) -> Result<(), CpuError> {
        let cycle = match self.state {
            CpuState::Halted => return Ok(()),
            CpuState::Fetching => 0,
            CpuState::Executing(c) => c as usize,
        };

        if cycle == 1 && !store.is_defined(self.regs.ir) {
            return Err(CpuError::UndefinedOpcode(self.regs.ir));
        }

        let halted = self.run_cycle(store, cycle)?;
        self.cycles += 1;

        self.state = if halted {
            CpuState::Halted
        } else if cycle == 0 {
            // The fetch overlap (PC advance) lives in cycle 1, so cycle 1
            // always runs even when the stored word is empty.
            CpuState::Executing(1)
        } else if cycle == 3 || store.done_after(self.regs.carry, self.regs.ir, cycle) {
            CpuState::Fetching
        } else {
            CpuState::Executing(cycle as u8 + 1)
        };
        Ok(())
    }

    /// Execute one full instruction. No-op once halted.
    pub fn step(&mut self, store: &ControlStore) -> Result<(), CpuError> {
        if self.is_halted() {
            return Ok(());
        }
        loop {
            self.step_cycle(store)?;
            match self.state {
                CpuState::Fetching | CpuState::Halted => return Ok(()),
                CpuState::Executing(_) => {}
            }
        }
    }

    /// Run until the halt latch is set. Returns instructions executed.
    pub fn run(&mut self, store: &ControlStore) -> Result<u64, CpuError> {
        let mut executed = 0;
        while !self.is_halted() {
            self.step(store)?;
            executed += 1;
        }
        Ok(executed)
    }

    /// Run at most `max_steps` instructions. Returns instructions executed.
    pub fn run_limited(&mut self, store: &ControlStore, max_steps: u64) -> Result<u64, CpuError> {
        let mut executed = 0;
        while !self.is_halted() && executed < max_steps {
            self.step(store)?;
            executed += 1;
        }
        Ok(executed)
    }

    /// One cycle: assert, falling edge, re-assert, rising edge.
    /// Returns true when the halt latch was set.
    fn run_cycle(&mut self, store: &ControlStore, cycle: usize) -> Result<bool, CpuError> {
        let stored = store.word(self.regs.carry, self.regs.ir, cycle);
        let word = stored | implicit_signals(cycle);

        let (bus_value, alu_carry) = self.assert_bus(word)?;
        self.falling_edge(word, bus_value, alu_carry)?;

        // Sources that depend on just-latched values (the ALU after a carry
        // update, memory after an address-register load) settle here.
        let (bus_value, _) = self.assert_bus(word)?;
        self.rising_edge(word, bus_value)
    }

    /// Drive every enabled source onto a freshly released bus.
    fn assert_bus(&mut self, word: ControlWord) -> Result<(Option<u8>, bool), CpuError> {
        let (alu_result, alu_carry) = self.alu_outputs(word);
        self.bus.release();
        if word.contains(ControlWord::AO) {
            self.bus.assert(self.regs.a)?;
        }
        if word.contains(ControlWord::BO) {
            self.bus.assert(self.regs.b)?;
        }
        if word.contains(ControlWord::PCO) {
            self.bus.assert(self.regs.pc)?;
        }
        if word.contains(ControlWord::MR) {
            self.bus.assert(self.mem.read(self.regs.ar))?;
        }
        if word.contains(ControlWord::IR4) {
            self.bus.assert(self.regs.operand_nibble())?;
        }
        if word.contains(ControlWord::LO) {
            self.bus.assert(self.regs.lr)?;
        }
        if word.contains(ControlWord::EO) {
            self.bus.assert(alu_result)?;
        }
        if word.contains(ControlWord::SO) {
            self.bus.assert(self.shifter_output(word))?;
        }
        Ok((self.bus.read(), alu_carry))
    }

    /// Sample the ALU with the word's port routing and carry-in source.
    fn alu_outputs(&self, word: ControlWord) -> (u8, bool) {
        let a_port = if word.contains(ControlWord::EDP) {
            self.regs.dp
        } else if word.contains(ControlWord::EPC) {
            self.regs.pc
        } else if word.contains(ControlWord::EAR) {
            self.regs.ar
        } else {
            self.regs.a
        };
        let b_port = if word.contains(ControlWord::EI4) {
            self.regs.operand_nibble()
        } else {
            self.regs.b
        };
        let carry_in = word.contains(ControlWord::EC1)
            || (word.contains(ControlWord::ECC) && self.regs.carry);
        alu::alu(
            a_port,
            b_port,
            word.alu_select(),
            word.contains(ControlWord::EM),
            carry_in,
        )
    }

    /// Sample the shifter: nibble-encoded distance, or the fixed right-4.
    fn shifter_output(&self, word: ControlWord) -> u8 {
        if word.contains(ControlWord::SW4) {
            self.regs.a >> 4
        } else {
            alu::shift(self.regs.a, self.regs.operand_nibble())
        }
    }

    /// First-phase latches, in order; carry commits before A and B so a
    /// carry-producing operation sees operands consistent with the ALU's
    /// synchronous read.
    fn falling_edge(
        &mut self,
        word: ControlWord,
        bus: Option<u8>,
        alu_carry: bool,
    ) -> Result<(), CpuError> {
        if word.contains(ControlWord::APC) {
            self.regs.ar = self.regs.pc;
        }
        if word.contains(ControlWord::ARI) {
            self.regs.ar = driven(bus)?;
        }
        if word.contains(ControlWord::LRI) {
            self.regs.lr = driven(bus)?;
        }
        if word.contains(ControlWord::CI) {
            self.regs.carry = alu_carry;
        }
        if word.contains(ControlWord::AI) {
            self.regs.a = driven(bus)?;
        }
        if word.contains(ControlWord::BI) {
            self.regs.b = driven(bus)?;
        }
        if word.contains(ControlWord::DPI) {
            self.regs.dp = driven(bus)?;
        }
        if word.contains(ControlWord::PCI) {
            self.regs.pc = driven(bus)?;
        }
        if word.contains(ControlWord::MW) {
            self.mem.write(self.regs.ar, driven(bus)?);
        }
        Ok(())
    }

    /// Second-phase latches. Returns true when the halt latch was set.
    fn rising_edge(&mut self, word: ControlWord, bus: Option<u8>) -> Result<bool, CpuError> {
        match rising_action(word) {
            RisingAction::Halt => Ok(true),
            RisingAction::Latch { ir, pc } => {
                if ir {
                    self.regs.ir = driven(bus)?;
                }
                match pc {
                    PcAction::Load => self.regs.pc = driven(bus)?,
                    PcAction::Advance => self.regs.advance_pc(),
                    PcAction::Hold => {}
                }
                Ok(false)
            }
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural signals the engine injects per cycle; never stored.
fn implicit_signals(cycle: usize) -> ControlWord {
    match cycle {
        0 => ControlWord::APC.union(ControlWord::IRI),
        1 => ControlWord::PCA,
        _ => ControlWord::empty(),
    }
}

fn driven(bus: Option<u8>) -> Result<u8, CpuError> {
    bus.ok_or(CpuError::FloatingBus)
}

/// What the program counter does on the rising edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PcAction {
    Hold,
    Advance,
    Load,
}

/// The single rising-edge action for a cycle.
///
/// Halt wins over everything; a PC load wins over the fetch advance. These
/// tie-breaks replace the implicit priority of sequential flag checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RisingAction {
    Halt,
    Latch { ir: bool, pc: PcAction },
}

fn rising_action(word: ControlWord) -> RisingAction {
    if word.contains(ControlWord::HLT) {
        return RisingAction::Halt;
    }
    let pc = if word.contains(ControlWord::PCL) {
        PcAction::Load
    } else if word.contains(ControlWord::PCA) {
        PcAction::Advance
    } else {
        PcAction::Hold
    };
    RisingAction::Latch {
        ir: word.contains(ControlWord::IRI),
        pc,
    }
}

/// Errors that abort a step.
///
/// All are fatal to the run: a corrupted bus or an undefined opcode
/// invalidates every subsequent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("bus conflict: {0}")]
    BusConflict(#[from] BusConflict),

    #[error("undefined opcode {0:#04x}")]
    UndefinedOpcode(u8),

    #[error("latch enabled on a floating bus")]
    FloatingBus,
}
