//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains definitions for opcodes, function codes, and decoding logic, organized
//! by RISC-V extension.
//!
//! # Extensions
//!
//! * `rv64i`: Base Integer Instruction Set (64-bit).
//! * `rv64m`: Standard Extension for Integer Multiplication and Division.
//! * `privileged`: Zicsr access, ECALL, EBREAK, MRET, and trap causes.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Instruction decoding for the R, I, S, B, U and J formats.
pub mod decode;

/// Instruction disassembler for tracing and diagnostics.
pub mod disasm;

/// Instruction encoding structures and bit extraction utilities.
pub mod instruction;

/// Privileged architecture definitions (system instructions, trap causes).
pub mod privileged;

/// Base integer instruction set (64-bit RISC-V core instructions).
pub mod rv64i;

/// Integer multiply/divide extension.
pub mod rv64m;
