//! Cursor-based assembler.
//!
//! The assembler owns a 256-byte memory image and a movable cursor. Each
//! mnemonic call encodes one instruction at the cursor and advances it;
//! `origin` moves the cursor, `byte` emits raw data. The finished image is
//! loaded into a machine wholesale.
//!
//! ```
//! use micro181::asm::Assembler;
//!
//! let mut asm = Assembler::new();
//! asm.imm(1).unwrap();
//! asm.a2b().unwrap();
//! asm.add().unwrap();
//! asm.halt().unwrap();
//! ```

use crate::cpu::decode::{encode, EncodeError, Instruction};
use crate::cpu::memory::MEMORY_SIZE;
use crate::cpu::registers::RESET_VECTOR;
use thiserror::Error;

/// The assembler state: an image under construction and the emit cursor.
#[derive(Debug, Clone)]
pub struct Assembler {
    image: [u8; MEMORY_SIZE],
    cursor: u8,
}

/// Generate the no-operand mnemonic methods.
macro_rules! plain_mnemonics {
    ($(($method:ident, $variant:ident, $doc:expr)),+ $(,)?) => {
        $(
            #[doc = $doc]
            pub fn $method(&mut self) -> Result<u8, AssemblerError> {
                self.emit(Instruction::$variant)
            }
        )+
    };
}

impl Assembler {
    /// Create an assembler with a zeroed image and the cursor at the reset
    /// vector.
    pub fn new() -> Self {
        Self {
            image: [0; MEMORY_SIZE],
            cursor: RESET_VECTOR,
        }
    }

    /// Move the cursor.
    pub fn origin(&mut self, addr: u8) {
        self.cursor = addr;
    }

    /// The current cursor position (the address of the next emit).
    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    /// The assembled 256-byte image.
    pub fn image(&self) -> &[u8; MEMORY_SIZE] {
        &self.image
    }

    /// Encode `instr` at the cursor. Returns the address it was placed at.
    pub fn emit(&mut self, instr: Instruction) -> Result<u8, AssemblerError> {
        let byte = encode(&instr)?;
        Ok(self.byte(byte))
    }

    /// Place a raw data byte at the cursor. Returns its address.
    pub fn byte(&mut self, value: u8) -> u8 {
        let addr = self.cursor;
        self.image[addr as usize] = value;
        self.cursor = self.cursor.wrapping_add(1);
        addr
    }

    // ==================== Nibble-operand mnemonics ====================

    /// `IMM n`: load accumulator with an immediate nibble.
    pub fn imm(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Imm(n))
    }

    /// `SD n`: store accumulator to `mem[DP + n]`.
    pub fn sd(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Sd(n))
    }

    /// `SI n`: store accumulator through the pointer at `DP + n`.
    pub fn si(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Si(n))
    }

    /// `LD n`: load accumulator from `mem[DP + n]`.
    pub fn ld(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Ld(n))
    }

    /// `LI n`: load accumulator through the pointer at `DP + n`.
    pub fn li(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Li(n))
    }

    /// `SH n`: shift by the raw nibble encoding.
    pub fn sh(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Sh(n))
    }

    /// Shift left by `distance` (0..=7); sugar for the `n >= 8` encoding.
    pub fn shl(&mut self, distance: u8) -> Result<u8, AssemblerError> {
        if distance > 7 {
            return Err(AssemblerError::ShiftRange(distance));
        }
        self.emit(Instruction::Sh(8 + distance))
    }

    /// Shift right by `distance` (0..=7).
    pub fn shr(&mut self, distance: u8) -> Result<u8, AssemblerError> {
        if distance > 7 {
            return Err(AssemblerError::ShiftRange(distance));
        }
        self.emit(Instruction::Sh(distance))
    }

    /// `JV n`: jump via the pointer at `DP + n`.
    pub fn jv(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Jv(n))
    }

    /// `JT n`: jump via the table entry at `DP + B + n`.
    pub fn jt(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Jt(n))
    }

    /// `CL n`: carry := A < n (n in 0..=3).
    pub fn cl(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Cl(n))
    }

    /// `LINK n`: link register := next instruction address + n (n in 0..=3).
    pub fn link(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Link(n))
    }

    /// `SCC n`: skip n instructions if carry clear.
    pub fn scc(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Scc(n))
    }

    /// `SCS n`: skip n instructions if carry set.
    pub fn scs(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Scs(n))
    }

    /// `DPE n`: DP := `mem[DP + B + n]`.
    pub fn dpe(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Dpe(n))
    }

    /// `DPF n`: DP := `mem[DP + n]`.
    pub fn dpf(&mut self, n: u8) -> Result<u8, AssemblerError> {
        self.emit(Instruction::Dpf(n))
    }

    // ==================== Plain mnemonics ====================

    plain_mnemonics! {
        (cleb, Cleb, "`CLEB`: carry := A <= B."),
        (clebc, Clebc, "`CLEBC`: carry := A < B + carry."),
        (clb, Clb, "`CLB`: carry := A < B."),
        (sub, Sub, "`SUB`: A := A - B."),
        (sbc, Sbc, "`SBC`: A := A - B - 1 + carry."),
        (adc, Adc, "`ADC`: A := A + B + carry."),
        (add, Add, "`ADD`: A := A + B."),
        (inc, Inc, "`INC`: A := A + 1."),
        (dec, Dec, "`DEC`: A := A - 1."),
        (ret, Ret, "`RET`: PC := LR."),
        (c2a, C2a, "`C2A`: A := carry."),
        (a2dp, A2dp, "`A2DP`: DP := A."),
        (dp2a, Dp2a, "`DP2A`: A := DP."),
        (a2b, A2b, "`A2B`: B := A."),
        (xchg, Xchg, "`XCHG`: swap A and B."),
        (a2l, A2l, "`A2L`: LR := A."),
        (halt, Halt, "`HALT`: set the halt latch."),
        (l2a, L2a, "`L2A`: A := LR."),
        (split, Split, "`SPLIT`: B := A & 0x0F, A := A >> 4."),
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("shift distance {0} exceeds 7")]
    ShiftRange(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_at_cursor() {
        let mut asm = Assembler::new();
        assert_eq!(asm.cursor(), RESET_VECTOR);
        let addr = asm.imm(5).unwrap();
        assert_eq!(addr, RESET_VECTOR);
        assert_eq!(asm.cursor(), RESET_VECTOR + 1);
        assert_eq!(asm.image()[RESET_VECTOR as usize], 0x05);
    }

    #[test]
    fn test_origin_moves_cursor() {
        let mut asm = Assembler::new();
        asm.origin(0x80);
        asm.halt().unwrap();
        assert_eq!(asm.image()[0x80], 0xbb);
        assert_eq!(asm.image()[RESET_VECTOR as usize], 0x00);
    }

    #[test]
    fn test_data_bytes() {
        let mut asm = Assembler::new();
        asm.origin(0x00);
        asm.byte(0xde);
        asm.byte(0xad);
        assert_eq!(&asm.image()[0..2], &[0xde, 0xad]);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut asm = Assembler::new();
        asm.origin(0xff);
        asm.halt().unwrap();
        assert_eq!(asm.cursor(), 0x00);
    }

    #[test]
    fn test_operand_range_errors() {
        let mut asm = Assembler::new();
        assert!(asm.imm(16).is_err());
        assert!(asm.cl(4).is_err());
        assert!(asm.link(9).is_err());
        assert!(asm.shl(8).is_err());
        // Failed emits do not move the cursor.
        assert_eq!(asm.cursor(), RESET_VECTOR);
    }

    #[test]
    fn test_shift_sugar() {
        let mut asm = Assembler::new();
        asm.shl(3).unwrap();
        asm.shr(2).unwrap();
        let base = RESET_VECTOR as usize;
        assert_eq!(asm.image()[base], 0x5b);
        assert_eq!(asm.image()[base + 1], 0x52);
    }

    #[test]
    fn test_known_encodings() {
        let mut asm = Assembler::new();
        asm.imm(1).unwrap();
        asm.a2b().unwrap();
        asm.imm(1).unwrap();
        asm.link(0).unwrap();
        asm.xchg().unwrap();
        asm.add().unwrap();
        asm.scs(1).unwrap();
        asm.ret().unwrap();
        asm.halt().unwrap();
        let base = RESET_VECTOR as usize;
        assert_eq!(
            &asm.image()[base..base + 9],
            &[0x01, 0xb8, 0x01, 0xb0, 0xb9, 0xaa, 0xd1, 0xb4, 0xbb]
        );
    }
}
