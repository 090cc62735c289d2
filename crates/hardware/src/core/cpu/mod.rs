//! CPU Core Definition.
//!
//! This module defines the central `Cpu` structure, the container for the architectural
//! state of the single simulated hart, and the per-step decode context. It coordinates:
//! 1. **State Management:** General-purpose registers, program counter, and CSRs.
//! 2. **Execution:** `exec_once` fetches, decodes and retires one instruction
//!    (see [`execution`]).
//! 3. **Memory Access:** Loads and stores routed through the system [`Bus`].
//! 4. **Traps:** `ecall` / `mret` and Zicsr instructions (see [`trap`] and [`csr`]).
//!
//! [`Bus`]: crate::soc::Bus

/// Zicsr instruction execution.
pub mod csr;

/// Fetch, decode, and execute of a single instruction.
pub mod execution;

/// Load and store helpers.
pub mod memory;

/// Environment call and trap return.
pub mod trap;

use crate::common::constants::RESET_VECTOR;
use crate::core::arch::csr::Csrs;
use crate::core::arch::gpr::Gpr;

/// Architectural state of the simulated hart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cpu {
    /// General-purpose registers.
    pub gpr: Gpr,
    /// Program counter.
    pub pc: u64,
    /// Control and status registers.
    pub csrs: Csrs,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Creates a hart in its reset state: registers zero, `pc` at the reset vector,
    /// `mstatus` at its reset value.
    pub fn new() -> Self {
        Self {
            gpr: Gpr::new(),
            pc: RESET_VECTOR,
            csrs: Csrs::default(),
        }
    }

    /// Returns the hart to its reset state with `pc` set to `entry`.
    pub fn reset(&mut self, entry: u64) {
        *self = Self::new();
        self.pc = entry;
    }
}

/// Per-step decode context.
///
/// Created fresh for every instruction. `snpc` is the static next PC (`pc + 4`);
/// `dnpc` starts equal to it and is overwritten by taken branches, jumps and traps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decode {
    /// Address of the instruction.
    pub pc: u64,
    /// Static next PC.
    pub snpc: u64,
    /// Dynamic next PC.
    pub dnpc: u64,
    /// Raw instruction word.
    pub inst: u32,
    /// Rendered trace line (address, bytes, disassembly).
    pub logbuf: String,
}

impl Decode {
    /// Starts a decode context for the instruction at `pc`.
    pub fn new(pc: u64) -> Self {
        Self {
            pc,
            snpc: pc,
            dnpc: pc,
            inst: 0,
            logbuf: String::new(),
        }
    }
}

/// What the engine must do after an instruction retires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retire {
    /// Continue with the next instruction.
    Next,
    /// The guest requested a halt (`ebreak`); carries the exit value from `a0`.
    Halt(u64),
}
