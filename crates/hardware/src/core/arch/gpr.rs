//! RISC-V General-Purpose Register File.
//!
//! This module implements the General-Purpose Register (GPR) file for the RISC-V architecture.
//! It performs the following:
//! 1. **Storage:** Maintains 32 integer registers (`x0`-`x31`).
//! 2. **Invariant Enforcement:** Ensures that register `x0` is hardwired to zero.
//! 3. **Debugging:** Renders the register state with ABI names for `info r`.

use std::io::{self, Write};

use crate::isa::abi;

/// General-Purpose Register file.
///
/// Contains 32 general-purpose registers used for integer operations. Register `x0`
/// is hardwired to zero and cannot be modified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [u64; 32],
}

impl Gpr {
    /// Creates a new general-purpose register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self { regs: [0; 32] }
    }

    /// Reads a general-purpose register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    ///
    /// # Returns
    ///
    /// The 64-bit value stored in the specified register. Register `x0` always returns 0.
    #[inline]
    pub fn read(&self, idx: usize) -> u64 {
        if idx == 0 { 0 } else { self.regs[idx & 0x1F] }
    }

    /// Writes a value to a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    /// * `val` - The 64-bit value to write. Writes to `x0` are discarded.
    #[inline]
    pub fn write(&mut self, idx: usize, val: u64) {
        if idx != 0 {
            self.regs[idx & 0x1F] = val;
        }
    }

    /// Copies the whole file out as a plain array.
    pub fn snapshot(&self) -> [u64; 32] {
        self.regs
    }

    /// Overwrites the whole file from a plain array; `x0` stays zero.
    pub fn restore(&mut self, regs: &[u64; 32]) {
        self.regs = *regs;
        self.regs[0] = 0;
    }

    /// Writes one `name  hex  decimal` line per register.
    ///
    /// # Errors
    ///
    /// Propagates failures of the writer.
    pub fn dump(&self, out: &mut dyn Write) -> io::Result<()> {
        for (i, name) in abi::REG_NAMES.iter().enumerate() {
            let val = self.read(i);
            writeln!(out, "{name:<6}{val:<#20x}{val}")?;
        }
        Ok(())
    }
}
