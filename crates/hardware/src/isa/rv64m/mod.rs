//! RISC-V Multiply/Divide Extension (M).
//!
//! These instructions share `OP_REG` / `OP_REG_32` with base integer arithmetic and
//! are selected by `funct7 == M_EXTENSION`.

/// Selector value in funct7 for multiply/divide operations.
pub const M_EXTENSION: u32 = 0b000_0001;

/// Function code 3 definitions for multiply/divide operations.
pub mod funct3 {
    /// Multiply, low 64 bits.
    pub const MUL: u32 = 0b000;
    /// Multiply high, signed x signed.
    pub const MULH: u32 = 0b001;
    /// Multiply high, signed x unsigned.
    pub const MULHSU: u32 = 0b010;
    /// Multiply high, unsigned x unsigned.
    pub const MULHU: u32 = 0b011;
    /// Divide (signed).
    pub const DIV: u32 = 0b100;
    /// Divide (unsigned).
    pub const DIVU: u32 = 0b101;
    /// Remainder (signed).
    pub const REM: u32 = 0b110;
    /// Remainder (unsigned).
    pub const REMU: u32 = 0b111;
}
