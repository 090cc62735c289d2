//! Unit tests, grouped by library module.

/// Configuration defaults and JSON overrides.
pub mod config;
/// Differential testing against a reference model.
pub mod difftest;
/// Disassembler output.
pub mod disasm;
/// Call tracer.
pub mod ftrace;
/// Raw and ELF image loading.
pub mod loader;
/// Bus and devices.
pub mod soc;
/// Run statistics.
pub mod stats;
/// Function symbol table.
pub mod symbols;
