//! Instruction field extraction.
//!
//! Provides the bit-field accessors shared by the decoder, the executor, the call
//! tracer and the disassembler, plus the decoded-instruction record.

use crate::common::constants::{OPCODE_MASK, RD_MASK, RD_SHIFT, RS1_MASK, RS1_SHIFT};

/// Bit mask for the second source register field (bits 20-24).
pub const RS2_MASK: u32 = 0x1F;
/// Bit mask for the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;
/// Bit mask for the CSR address field (bits 20-31).
pub const CSR_MASK: u32 = 0xFFF;

/// Field accessors for a raw 32-bit instruction word.
pub trait InstructionBits {
    /// Opcode field (bits 0-6).
    fn opcode(&self) -> u32;
    /// Destination register (bits 7-11).
    fn rd(&self) -> usize;
    /// First source register (bits 15-19).
    fn rs1(&self) -> usize;
    /// Second source register (bits 20-24).
    fn rs2(&self) -> usize;
    /// funct3 field (bits 12-14).
    fn funct3(&self) -> u32;
    /// funct7 field (bits 25-31).
    fn funct7(&self) -> u32;
    /// CSR address (bits 20-31).
    fn csr(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> RD_SHIFT) & RD_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> RS1_SHIFT) & RS1_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> 20) & RS2_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }

    #[inline(always)]
    fn csr(&self) -> u32 {
        (self >> 20) & CSR_MASK
    }
}

/// Decoded instruction: every field the executor needs, with the immediate already
/// sign-extended for the instruction's format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Raw 32-bit instruction encoding.
    pub raw: u32,
    /// Extracted opcode field.
    pub opcode: u32,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Function code field 3.
    pub funct3: u32,
    /// Function code field 7.
    pub funct7: u32,
    /// Sign-extended immediate value (0 for R-type and system instructions).
    pub imm: i64,
}

impl Decoded {
    /// CSR address of a Zicsr instruction.
    #[inline]
    pub fn csr(&self) -> u32 {
        self.raw.csr()
    }

    /// Shift amount of an RV64 immediate shift (6 bits).
    #[inline]
    pub const fn shamt(&self) -> u32 {
        (self.imm as u32) & 0x3F
    }
}
