//! RV64 instruction-set simulator and debugger library.
//!
//! This crate implements an RV64IM + Zicsr interpreter with a symbolic debugger:
//! 1. **Core:** Register file, CSRs, ALU and the single-instruction execute step.
//! 2. **ISA:** Field extraction, decoding and disassembly.
//! 3. **SoC:** Guest RAM, the system bus and memory-mapped devices (serial, RTC).
//! 4. **Simulation:** Run loop, image loading, instruction and call tracing, and
//!    differential testing against a reference model.
//! 5. **Debugger:** Expression evaluator, watchpoints and the command loop.

/// Common types and constants (widths, access types, errors).
pub mod common;
/// Simulator configuration (defaults and JSON sections).
pub mod config;
/// CPU core (arch state, ALU, execution).
pub mod core;
/// Debugger (expressions, watchpoints, command loop).
pub mod debugger;
/// Instruction set (fields, decode, ABI, disassembly).
pub mod isa;
/// Run loop, loading, tracing and differential testing.
pub mod sim;
/// System-on-chip (bus, memory, devices).
pub mod soc;
/// Run statistics.
pub mod stats;

/// Root configuration type; use `Config::default()` or [`Config::from_json`].
pub use crate::config::Config;
/// Architectural state of the hart.
pub use crate::core::Cpu;
/// Debugger front end.
pub use crate::debugger::Sdb;
/// The simulator.
pub use crate::sim::Simulator;
