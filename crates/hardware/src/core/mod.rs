//! Core processor implementation.
//!
//! This module contains the interpreter for the single simulated hart: its
//! architectural state, the integer ALU, and the fetch/decode/execute step.

/// Integer ALU (I and M extensions).
pub mod alu;

/// Architecture-specific components (CSRs, register file, traps).
pub mod arch;

/// CPU state and single-instruction execution.
pub mod cpu;

pub use self::cpu::{Cpu, Decode, Retire};
