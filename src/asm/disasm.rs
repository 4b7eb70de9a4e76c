//! Disassembler.
//!
//! Converts instruction bytes back to mnemonic text. The byte-level
//! inverse of the assembler is `decode`/`encode`; this module renders the
//! human-readable listing on top of it.

use crate::cpu::decode::{decode, Instruction};

/// Disassemble a single byte to mnemonic text.
///
/// Reserved bytes render as `???` with the raw value, so a listing of an
/// arbitrary image never fails.
pub fn disassemble_byte(byte: u8) -> String {
    match decode(byte) {
        Ok(instr) => mnemonic(&instr),
        Err(_) => format!("??? ; {:#04x}", byte),
    }
}

/// Disassemble a byte slice into a listing, one instruction per line,
/// addresses starting at `origin`.
pub fn disassemble(bytes: &[u8], origin: u8) -> String {
    let mut output = String::new();
    for (i, &byte) in bytes.iter().enumerate() {
        let addr = origin.wrapping_add(i as u8);
        output.push_str(&format!(
            "{:02x}: {:02x}  {}\n",
            addr,
            byte,
            disassemble_byte(byte)
        ));
    }
    output
}

/// Render a decoded instruction as mnemonic text.
pub fn mnemonic(instr: &Instruction) -> String {
    match instr {
        Instruction::Imm(n) => format!("IMM {}", n),
        Instruction::Sd(n) => format!("SD {}", n),
        Instruction::Si(n) => format!("SI {}", n),
        Instruction::Ld(n) => format!("LD {}", n),
        Instruction::Li(n) => format!("LI {}", n),
        Instruction::Sh(n) => format!("SH {}", n),
        Instruction::Jv(n) => format!("JV {}", n),
        Instruction::Jt(n) => format!("JT {}", n),
        Instruction::Cl(n) => format!("CL {}", n),
        Instruction::Cleb => "CLEB".to_string(),
        Instruction::Clebc => "CLEBC".to_string(),
        Instruction::Clb => "CLB".to_string(),
        Instruction::Sub => "SUB".to_string(),
        Instruction::Sbc => "SBC".to_string(),
        Instruction::Adc => "ADC".to_string(),
        Instruction::Add => "ADD".to_string(),
        Instruction::Inc => "INC".to_string(),
        Instruction::Dec => "DEC".to_string(),
        Instruction::Link(n) => format!("LINK {}", n),
        Instruction::Ret => "RET".to_string(),
        Instruction::C2a => "C2A".to_string(),
        Instruction::A2dp => "A2DP".to_string(),
        Instruction::Dp2a => "DP2A".to_string(),
        Instruction::A2b => "A2B".to_string(),
        Instruction::Xchg => "XCHG".to_string(),
        Instruction::A2l => "A2L".to_string(),
        Instruction::Halt => "HALT".to_string(),
        Instruction::L2a => "L2A".to_string(),
        Instruction::Split => "SPLIT".to_string(),
        Instruction::Scc(n) => format!("SCC {}", n),
        Instruction::Scs(n) => format!("SCS {}", n),
        Instruction::Dpe(n) => format!("DPE {}", n),
        Instruction::Dpf(n) => format!("DPF {}", n),
    }
}
