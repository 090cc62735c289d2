//! Privileged Architecture Definitions.
//!
//! # Modules
//!
//! - `opcodes`: System instruction encodings (ECALL, EBREAK, MRET) and CSR funct3 codes.
//! - `cause`: Exception cause codes written to `mcause`.

/// System instruction opcodes.
pub mod opcodes {
    /// System instruction opcode (CSR access, ECALL, EBREAK, MRET).
    pub const OP_SYSTEM: u32 = 0b111_0011;

    /// Environment call.
    pub const ECALL: u32 = 0x0000_0073;

    /// Environment break; the guest's halt request.
    pub const EBREAK: u32 = 0x0010_0073;

    /// Machine-mode trap return.
    pub const MRET: u32 = 0x3020_0073;

    /// funct3 of the fixed-encoding system instructions above.
    pub const PRIV: u32 = 0b000;
    /// Atomic read/write CSR.
    pub const CSRRW: u32 = 0b001;
    /// Atomic read and set bits in CSR.
    pub const CSRRS: u32 = 0b010;
    /// Atomic read and clear bits in CSR.
    pub const CSRRC: u32 = 0b011;
    /// Atomic read/write CSR, immediate source.
    pub const CSRRWI: u32 = 0b101;
    /// Atomic read and set bits in CSR, immediate source.
    pub const CSRRSI: u32 = 0b110;
    /// Atomic read and clear bits in CSR, immediate source.
    pub const CSRRCI: u32 = 0b111;
}

/// Exception cause codes (interrupt bit clear).
pub mod cause {
    /// Environment call from M-mode (11).
    pub const ENVIRONMENT_CALL_FROM_M_MODE: u64 = 11;
}
