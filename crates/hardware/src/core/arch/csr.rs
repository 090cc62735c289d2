//! Control and Status Register (CSR) definitions and operations.
//!
//! This module implements the machine-mode CSR subset of the simulated hart. It provides:
//! 1. **Address Definitions:** Constants for the supported machine CSRs.
//! 2. **Field Masks:** Bitmasks and shifts for the `mstatus` fields touched by traps.
//! 3. **Register Storage:** The `Csrs` struct for maintaining architectural state.
//! 4. **Access Logic:** Read and write by address, and lookup by name for the debugger.

use crate::common::constants::MSTATUS_RESET;

/// Machine hardware thread ID CSR address.
pub const MHARTID: u32 = 0xF14;

/// Machine status register CSR address.
pub const MSTATUS: u32 = 0x300;

/// Machine ISA register CSR address.
pub const MISA: u32 = 0x301;

/// Machine interrupt enable register CSR address.
pub const MIE: u32 = 0x304;

/// Machine trap vector base address register CSR address.
pub const MTVEC: u32 = 0x305;

/// Machine scratch register CSR address.
pub const MSCRATCH: u32 = 0x340;

/// Machine exception program counter CSR address.
pub const MEPC: u32 = 0x341;

/// Machine cause register CSR address.
pub const MCAUSE: u32 = 0x342;

/// Machine trap value register CSR address.
pub const MTVAL: u32 = 0x343;

/// Machine interrupt pending register CSR address.
pub const MIP: u32 = 0x344;

/// Global machine interrupt enable bit in `mstatus`.
pub const MSTATUS_MIE: u64 = 1 << 3;

/// Previous machine interrupt enable bit in `mstatus`.
pub const MSTATUS_MPIE: u64 = 1 << 7;

/// Machine previous privilege field in `mstatus`.
pub const MSTATUS_MPP: u64 = 3 << 11;

/// Bit position of the MPP field.
pub const MSTATUS_MPP_SHIFT: u64 = 11;

/// MPP encoding of machine mode.
pub const PRV_M: u64 = 3;

/// MPP encoding of user mode.
pub const PRV_U: u64 = 0;

/// Bit set in `mcause` when the trap is an interrupt.
pub const CAUSE_INTERRUPT_BIT: u64 = 1 << 63;

/// `misa` for RV64IM: MXL = 64, extensions I and M.
pub const MISA_RV64IM: u64 = (2 << 62) | (1 << 8) | (1 << 12);

/// Name and address of every CSR the hart implements.
pub const CSR_NAMES: [(&str, u32); 10] = [
    ("mstatus", MSTATUS),
    ("misa", MISA),
    ("mie", MIE),
    ("mtvec", MTVEC),
    ("mscratch", MSCRATCH),
    ("mepc", MEPC),
    ("mcause", MCAUSE),
    ("mtval", MTVAL),
    ("mip", MIP),
    ("mhartid", MHARTID),
];

/// Control and Status Register file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Csrs {
    /// Machine status register.
    pub mstatus: u64,
    /// Machine ISA register.
    pub misa: u64,
    /// Machine interrupt enable.
    pub mie: u64,
    /// Machine trap vector base address.
    pub mtvec: u64,
    /// Machine scratch register.
    pub mscratch: u64,
    /// Machine exception program counter.
    pub mepc: u64,
    /// Machine trap cause.
    pub mcause: u64,
    /// Machine trap value.
    pub mtval: u64,
    /// Machine interrupt pending.
    pub mip: u64,
}

impl Default for Csrs {
    fn default() -> Self {
        Self {
            mstatus: MSTATUS_RESET,
            misa: MISA_RV64IM,
            mie: 0,
            mtvec: 0,
            mscratch: 0,
            mepc: 0,
            mcause: 0,
            mtval: 0,
            mip: 0,
        }
    }
}

impl Csrs {
    /// Reads a CSR value by its address.
    ///
    /// # Arguments
    ///
    /// * `addr` - The 12-bit CSR address.
    ///
    /// # Returns
    ///
    /// The stored value, or `None` when the hart does not implement `addr`.
    pub const fn read(&self, addr: u32) -> Option<u64> {
        let val = match addr {
            MSTATUS => self.mstatus,
            MISA => self.misa,
            MIE => self.mie,
            MTVEC => self.mtvec,
            MSCRATCH => self.mscratch,
            MEPC => self.mepc,
            MCAUSE => self.mcause,
            MTVAL => self.mtval,
            MIP => self.mip,
            MHARTID => 0,
            _ => return None,
        };
        Some(val)
    }

    /// Writes a value to a CSR by its address.
    ///
    /// Writes to read-only registers (`misa`, `mhartid`) are ignored.
    ///
    /// # Returns
    ///
    /// `false` when the hart does not implement `addr`.
    pub const fn write(&mut self, addr: u32, val: u64) -> bool {
        match addr {
            MSTATUS => self.mstatus = val,
            MIE => self.mie = val,
            MTVEC => self.mtvec = val,
            MSCRATCH => self.mscratch = val,
            MEPC => self.mepc = val,
            MCAUSE => self.mcause = val,
            MTVAL => self.mtval = val,
            MIP => self.mip = val,
            MISA | MHARTID => {}
            _ => return false,
        }
        true
    }

    /// Resolves a CSR name (`"mstatus"`, `"mepc"`, ...) to its address.
    pub fn lookup(name: &str) -> Option<u32> {
        CSR_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, addr)| addr)
    }

    /// Returns the name of the CSR at `addr`, if the hart implements it.
    pub fn name(addr: u32) -> Option<&'static str> {
        CSR_NAMES
            .iter()
            .find(|&&(_, a)| a == addr)
            .map(|&(n, _)| n)
    }
}
