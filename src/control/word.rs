//! The control word: one set of micro-signals.
//!
//! A control word is the complete set of signals active during one cycle of
//! one instruction. The signal vocabulary is a closed enumeration backed by
//! a fixed-width flag set, so an undefined signal name cannot exist and the
//! single-driver bus check is a popcount over the source mask.

use bitflags::bitflags;

bitflags! {
    /// The micro-signals of one control word.
    ///
    /// Grouped by function:
    /// - bus sources (`AO`..`SO`): drive the shared bus, at most one per word
    /// - falling-edge latches (`APC`..`MW`): commit in the first half-step
    /// - rising-edge latches (`HLT`..`PCL`): commit in the second half-step
    /// - ALU configuration (`EM`..`EI4`): function select, carry-in source
    ///   and operand port routing
    /// - shifter configuration (`SW4`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControlWord: u64 {
        // Bus sources
        /// Accumulator onto the bus.
        const AO = 1 << 0;
        /// B register onto the bus.
        const BO = 1 << 1;
        /// Program counter onto the bus.
        const PCO = 1 << 2;
        /// Memory read: `mem[AR]` onto the bus.
        const MR = 1 << 3;
        /// Low nibble of the instruction register onto the bus.
        const IR4 = 1 << 4;
        /// Link register onto the bus.
        const LO = 1 << 5;
        /// ALU result onto the bus.
        const EO = 1 << 6;
        /// Shifter result onto the bus.
        const SO = 1 << 7;

        // Falling-edge latches
        /// Address register from the program counter (direct path).
        const APC = 1 << 8;
        /// Address register from the bus.
        const ARI = 1 << 9;
        /// Link register from the bus.
        const LRI = 1 << 10;
        /// Carry flag from the ALU carry-out.
        const CI = 1 << 11;
        /// Accumulator from the bus.
        const AI = 1 << 12;
        /// B register from the bus.
        const BI = 1 << 13;
        /// Data pointer from the bus.
        const DPI = 1 << 14;
        /// Program counter from the bus (direct PC-in).
        const PCI = 1 << 15;
        /// Memory write: bus into `mem[AR]`.
        const MW = 1 << 16;

        // Rising-edge latches
        /// Halt latch. Terminal; overrides every other rising-edge action.
        const HLT = 1 << 17;
        /// Instruction register from the bus (fetch cycle).
        const IRI = 1 << 18;
        /// Program counter advance (fetch overlap).
        const PCA = 1 << 19;
        /// Program counter load from the bus; overrides `PCA`.
        const PCL = 1 << 20;

        // ALU configuration
        /// Logic mode (arithmetic mode when absent).
        const EM = 1 << 21;
        /// Function select bit 0.
        const ES0 = 1 << 22;
        /// Function select bit 1.
        const ES1 = 1 << 23;
        /// Function select bit 2.
        const ES2 = 1 << 24;
        /// Function select bit 3.
        const ES3 = 1 << 25;
        /// Carry-in forced to 1.
        const EC1 = 1 << 26;
        /// Carry-in from the carry flag.
        const ECC = 1 << 27;
        /// ALU A port reads the data pointer.
        const EDP = 1 << 28;
        /// ALU A port reads the program counter.
        const EPC = 1 << 29;
        /// ALU A port reads the address register.
        const EAR = 1 << 30;
        /// ALU B port reads the instruction-register low nibble.
        const EI4 = 1 << 31;

        // Shifter configuration
        /// Shifter performs a fixed right-4 instead of the nibble shift.
        const SW4 = 1 << 32;
    }
}

impl ControlWord {
    /// All bus-source signals.
    pub const SOURCES: ControlWord = ControlWord::AO
        .union(ControlWord::BO)
        .union(ControlWord::PCO)
        .union(ControlWord::MR)
        .union(ControlWord::IR4)
        .union(ControlWord::LO)
        .union(ControlWord::EO)
        .union(ControlWord::SO);

    /// All latches that read their value from the bus.
    ///
    /// `APC` and `CI` are excluded: they take direct paths from the program
    /// counter and the ALU carry-out respectively.
    pub const BUS_LATCHES: ControlWord = ControlWord::ARI
        .union(ControlWord::LRI)
        .union(ControlWord::AI)
        .union(ControlWord::BI)
        .union(ControlWord::DPI)
        .union(ControlWord::PCI)
        .union(ControlWord::MW)
        .union(ControlWord::IRI)
        .union(ControlWord::PCL);

    /// Number of bus-source signals set.
    #[inline]
    pub fn source_count(self) -> u32 {
        self.intersection(Self::SOURCES).bits().count_ones()
    }

    /// True when any latch in this word reads the bus.
    #[inline]
    pub fn reads_bus(self) -> bool {
        self.intersects(Self::BUS_LATCHES)
    }

    /// Decode the 4-bit ALU function select.
    #[inline]
    pub fn alu_select(self) -> u8 {
        let mut s = 0;
        if self.contains(Self::ES0) {
            s |= 1;
        }
        if self.contains(Self::ES1) {
            s |= 2;
        }
        if self.contains(Self::ES2) {
            s |= 4;
        }
        if self.contains(Self::ES3) {
            s |= 8;
        }
        s
    }
}
