//! RISC-V Base Integer Instruction Set (I).
//!
//! # Structure
//!
//! - `opcodes`: Major opcodes (bits 6-0).
//! - `funct3`: Minor opcodes distinguishing instructions within a major opcode.
//! - `funct7`: Alternate-encoding selector for R-type and shift instructions.

/// Base integer instruction set opcodes.
pub mod opcodes {
    /// Loads (LB, LH, LW, LD, LBU, LHU, LWU).
    pub const OP_LOAD: u32 = 0b000_0011;
    /// Memory ordering (FENCE, FENCE.I).
    pub const OP_MISC_MEM: u32 = 0b000_1111;
    /// Register-immediate arithmetic.
    pub const OP_IMM: u32 = 0b001_0011;
    /// Add upper immediate to PC.
    pub const OP_AUIPC: u32 = 0b001_0111;
    /// 32-bit register-immediate arithmetic (RV64 only).
    pub const OP_IMM_32: u32 = 0b001_1011;
    /// Stores (SB, SH, SW, SD).
    pub const OP_STORE: u32 = 0b010_0011;
    /// Register-register arithmetic, shared with the M extension.
    pub const OP_REG: u32 = 0b011_0011;
    /// Load upper immediate.
    pub const OP_LUI: u32 = 0b011_0111;
    /// 32-bit register-register arithmetic (RV64 only).
    pub const OP_REG_32: u32 = 0b011_1011;
    /// Conditional branches.
    pub const OP_BRANCH: u32 = 0b110_0011;
    /// Jump and link register.
    pub const OP_JALR: u32 = 0b110_0111;
    /// Jump and link.
    pub const OP_JAL: u32 = 0b110_1111;
}

/// Function code 3 definitions for base integer operations.
pub mod funct3 {
    /// Load byte (signed).
    pub const LB: u32 = 0b000;
    /// Load halfword (signed).
    pub const LH: u32 = 0b001;
    /// Load word (signed).
    pub const LW: u32 = 0b010;
    /// Load doubleword.
    pub const LD: u32 = 0b011;
    /// Load byte unsigned.
    pub const LBU: u32 = 0b100;
    /// Load halfword unsigned.
    pub const LHU: u32 = 0b101;
    /// Load word unsigned.
    pub const LWU: u32 = 0b110;

    /// Store byte.
    pub const SB: u32 = 0b000;
    /// Store halfword.
    pub const SH: u32 = 0b001;
    /// Store word.
    pub const SW: u32 = 0b010;
    /// Store doubleword.
    pub const SD: u32 = 0b011;

    /// Branch if equal.
    pub const BEQ: u32 = 0b000;
    /// Branch if not equal.
    pub const BNE: u32 = 0b001;
    /// Branch if less than (signed).
    pub const BLT: u32 = 0b100;
    /// Branch if greater or equal (signed).
    pub const BGE: u32 = 0b101;
    /// Branch if less than (unsigned).
    pub const BLTU: u32 = 0b110;
    /// Branch if greater or equal (unsigned).
    pub const BGEU: u32 = 0b111;

    /// Add / subtract.
    pub const ADD_SUB: u32 = 0b000;
    /// Shift left logical.
    pub const SLL: u32 = 0b001;
    /// Set less than (signed).
    pub const SLT: u32 = 0b010;
    /// Set less than (unsigned).
    pub const SLTU: u32 = 0b011;
    /// Exclusive or.
    pub const XOR: u32 = 0b100;
    /// Shift right logical / arithmetic.
    pub const SRL_SRA: u32 = 0b101;
    /// Or.
    pub const OR: u32 = 0b110;
    /// And.
    pub const AND: u32 = 0b111;
}

/// Function code 7 definitions for base integer operations.
pub mod funct7 {
    /// Default encoding (ADD, SRL).
    pub const DEFAULT: u32 = 0b000_0000;
    /// Alternate encoding (SUB, SRA).
    pub const ALT: u32 = 0b010_0000;
}
