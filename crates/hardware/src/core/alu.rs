//! Arithmetic Logic Unit (ALU).
//!
//! Integer arithmetic, logic, shifts, and the M-extension multiply/divide family for
//! both the 64-bit and the 32-bit (W-suffix) forms.
//!
//! All 32-bit (`is32 == true`) results are sign-extended from bit 31 to 64 bits.
//! Division by zero and signed overflow follow the RISC-V rules: quotient all ones,
//! remainder equal to the dividend, and `MIN / -1 = MIN` with remainder 0.

use crate::isa::rv64i::{funct3 as i_f3, funct7 as i_f7};
use crate::isa::rv64m::{M_EXTENSION, funct3 as m_f3};

/// Bit mask for shift amount in RV64 (6 bits: 0-63).
const SHAMT_MASK_RV64: u64 = 0x3f;

/// Bit mask for shift amount in RV32 (5 bits: 0-31).
const SHAMT_MASK_RV32: u32 = 0x1f;

/// Integer ALU operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Shift left logical.
    Sll,
    /// Set less than (signed).
    Slt,
    /// Set less than (unsigned).
    Sltu,
    /// Exclusive or.
    Xor,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Or.
    Or,
    /// And.
    And,
    /// Multiply, low bits.
    Mul,
    /// Multiply high, signed x signed.
    Mulh,
    /// Multiply high, signed x unsigned.
    Mulhsu,
    /// Multiply high, unsigned x unsigned.
    Mulhu,
    /// Divide (signed).
    Div,
    /// Divide (unsigned).
    Divu,
    /// Remainder (signed).
    Rem,
    /// Remainder (unsigned).
    Remu,
}

impl AluOp {
    /// Selects the operation of an `OP` / `OP-32` instruction.
    ///
    /// Returns `None` for reserved encodings, including the multiply-high forms of
    /// `OP-32` which do not exist in RV64.
    pub const fn from_reg(funct3: u32, funct7: u32, is32: bool) -> Option<Self> {
        if funct7 == M_EXTENSION {
            let op = match funct3 {
                m_f3::MUL => Self::Mul,
                m_f3::MULH if !is32 => Self::Mulh,
                m_f3::MULHSU if !is32 => Self::Mulhsu,
                m_f3::MULHU if !is32 => Self::Mulhu,
                m_f3::DIV => Self::Div,
                m_f3::DIVU => Self::Divu,
                m_f3::REM => Self::Rem,
                m_f3::REMU => Self::Remu,
                _ => return None,
            };
            return Some(op);
        }
        let op = match (funct3, funct7) {
            (i_f3::ADD_SUB, i_f7::DEFAULT) => Self::Add,
            (i_f3::ADD_SUB, i_f7::ALT) => Self::Sub,
            (i_f3::SLL, i_f7::DEFAULT) => Self::Sll,
            (i_f3::SRL_SRA, i_f7::DEFAULT) => Self::Srl,
            (i_f3::SRL_SRA, i_f7::ALT) => Self::Sra,
            (i_f3::SLT, i_f7::DEFAULT) if !is32 => Self::Slt,
            (i_f3::SLTU, i_f7::DEFAULT) if !is32 => Self::Sltu,
            (i_f3::XOR, i_f7::DEFAULT) if !is32 => Self::Xor,
            (i_f3::OR, i_f7::DEFAULT) if !is32 => Self::Or,
            (i_f3::AND, i_f7::DEFAULT) if !is32 => Self::And,
            _ => return None,
        };
        Some(op)
    }

    /// Selects the operation of an `OP-IMM` / `OP-IMM-32` instruction.
    ///
    /// `imm` is the sign-extended I-immediate; for shifts its upper bits select
    /// logical versus arithmetic and must otherwise be zero.
    pub const fn from_imm(funct3: u32, imm: i64, is32: bool) -> Option<Self> {
        let upper = ((imm as u64) >> if is32 { 5 } else { 6 }) & 0x7F;
        let alt = if is32 { 0b010_0000 } else { 0b01_0000 };
        let op = match funct3 {
            i_f3::ADD_SUB => Self::Add,
            i_f3::SLL if upper == 0 => Self::Sll,
            i_f3::SRL_SRA if upper == 0 => Self::Srl,
            i_f3::SRL_SRA if upper == alt => Self::Sra,
            i_f3::SLT if !is32 => Self::Slt,
            i_f3::SLTU if !is32 => Self::Sltu,
            i_f3::XOR if !is32 => Self::Xor,
            i_f3::OR if !is32 => Self::Or,
            i_f3::AND if !is32 => Self::And,
            _ => return None,
        };
        Some(op)
    }

    /// Executes the operation.
    ///
    /// # Arguments
    ///
    /// * `a`    - First operand.
    /// * `b`    - Second operand (also the shift amount).
    /// * `is32` - Perform the 32-bit (W-suffix) variant.
    ///
    /// # Examples
    ///
    /// ```
    /// use rvsdb_core::core::alu::AluOp;
    ///
    /// assert_eq!(AluOp::Add.execute(0xFFFF_FFFF, 1, true), 0);
    /// assert_eq!(AluOp::Slt.execute(-5_i64 as u64, 10, false), 1);
    /// assert_eq!(AluOp::Divu.execute(100, 7, false), 14);
    /// assert_eq!(AluOp::Div.execute(1, 0, false), u64::MAX);
    /// ```
    pub const fn execute(self, a: u64, b: u64, is32: bool) -> u64 {
        let sh6 = (b & SHAMT_MASK_RV64) as u32;
        let sh5 = b as u32 & SHAMT_MASK_RV32;
        match (self, is32) {
            (Self::Add, false) => a.wrapping_add(b),
            (Self::Add, true) => sext32((a as u32).wrapping_add(b as u32)),
            (Self::Sub, false) => a.wrapping_sub(b),
            (Self::Sub, true) => sext32((a as u32).wrapping_sub(b as u32)),

            (Self::Sll, false) => a.wrapping_shl(sh6),
            (Self::Sll, true) => sext32((a as u32).wrapping_shl(sh5)),
            (Self::Srl, false) => a.wrapping_shr(sh6),
            (Self::Srl, true) => sext32((a as u32).wrapping_shr(sh5)),
            (Self::Sra, false) => ((a as i64) >> sh6) as u64,
            (Self::Sra, true) => ((a as i32) >> sh5) as i64 as u64,

            (Self::Slt, _) => ((a as i64) < (b as i64)) as u64,
            (Self::Sltu, _) => (a < b) as u64,
            (Self::Xor, _) => a ^ b,
            (Self::Or, _) => a | b,
            (Self::And, _) => a & b,

            (Self::Mul, false) => a.wrapping_mul(b),
            (Self::Mul, true) => sext32((a as u32).wrapping_mul(b as u32)),
            (Self::Mulh, _) => (((a as i64 as i128) * (b as i64 as i128)) >> 64) as u64,
            (Self::Mulhsu, _) => (((a as i64 as i128) * (b as u128 as i128)) >> 64) as u64,
            (Self::Mulhu, _) => (((a as u128) * (b as u128)) >> 64) as u64,

            (Self::Div, false) => {
                if b == 0 {
                    u64::MAX
                } else {
                    (a as i64).wrapping_div(b as i64) as u64
                }
            }
            (Self::Div, true) => {
                if b as i32 == 0 {
                    u64::MAX
                } else {
                    (a as i32).wrapping_div(b as i32) as i64 as u64
                }
            }
            (Self::Divu, false) => {
                if b == 0 { u64::MAX } else { a / b }
            }
            (Self::Divu, true) => {
                if b as u32 == 0 {
                    u64::MAX
                } else {
                    sext32((a as u32) / (b as u32))
                }
            }
            (Self::Rem, false) => {
                if b == 0 {
                    a
                } else {
                    (a as i64).wrapping_rem(b as i64) as u64
                }
            }
            (Self::Rem, true) => {
                if b as i32 == 0 {
                    sext32(a as u32)
                } else {
                    (a as i32).wrapping_rem(b as i32) as i64 as u64
                }
            }
            (Self::Remu, false) => {
                if b == 0 { a } else { a % b }
            }
            (Self::Remu, true) => {
                if b as u32 == 0 {
                    sext32(a as u32)
                } else {
                    sext32((a as u32) % (b as u32))
                }
            }
        }
    }
}

/// Sign-extends a 32-bit result to 64 bits.
#[inline]
const fn sext32(v: u32) -> u64 {
    v as i32 as i64 as u64
}
