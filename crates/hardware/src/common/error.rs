//! Error definitions.
//!
//! Every fallible operation in the crate returns one of the enums below:
//! 1. **Memory:** [`MemError`] for accesses outside RAM and every device window.
//! 2. **Execution:** [`ExecError`] for a single step that cannot retire.
//! 3. **Debugger:** [`ExprError`] and [`WatchpointError`] for the command layer.
//! 4. **Start-up:** [`LoadError`] and [`DiffTestError`] for image and reference loading.
//! 5. **Aggregate:** [`SimError`] carries anything fatal up to the binary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::data::{AccessType, Width};

/// A physical access that no backing store claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemError {
    /// The address lies outside RAM and outside every device window.
    #[error("address {addr:#x} ({access}, {width} bytes) is out of bound")]
    OutOfBound {
        /// Faulting physical address.
        addr: u64,
        /// Width of the access.
        width: Width,
        /// Kind of the access.
        access: AccessType,
    },
}

/// Reasons a single instruction step cannot retire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The fetched word does not decode to a supported instruction.
    #[error("invalid instruction {inst:#010x} at pc = {pc:#x}")]
    InvalidInstruction {
        /// Address of the instruction.
        pc: u64,
        /// Raw encoding.
        inst: u32,
    },

    /// A fetch, load, or store touched unmapped memory.
    #[error("memory fault at pc = {pc:#x}: {source}")]
    Mem {
        /// Address of the faulting instruction.
        pc: u64,
        /// The underlying access error.
        #[source]
        source: MemError,
    },

    /// An `ecall` the trap glue cannot service.
    #[error("unsupported trap at pc = {pc:#x} (a7 = {a7:#x}, mtvec = {mtvec:#x})")]
    UnsupportedTrap {
        /// Address of the `ecall`.
        pc: u64,
        /// Syscall selector register at the time of the trap.
        a7: u64,
        /// Trap vector at the time of the trap.
        mtvec: u64,
    },
}

/// Failures while tokenizing or evaluating a debugger expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// No tokenizer rule matches at the given byte offset.
    #[error("no match at position {position} in '{expr}'")]
    NoMatch {
        /// The full expression text.
        expr: String,
        /// Byte offset of the unmatched character.
        position: usize,
    },

    /// A single token's text is too long to hold.
    #[error("token at position {position} is too long")]
    TokenTooLong {
        /// Byte offset where the token starts.
        position: usize,
    },

    /// The expression has more tokens than the evaluator accepts.
    #[error("expression has too many tokens")]
    TooManyTokens,

    /// Parentheses are unbalanced.
    #[error("unbalanced parentheses")]
    UnbalancedParens,

    /// An operator or sub-expression is missing its operand.
    #[error("bad expression")]
    BadExpression,

    /// Division or remainder by zero.
    #[error("division by zero")]
    DivideByZero,

    /// An integer literal does not fit in 64 bits.
    #[error("bad number '{0}'")]
    BadNumber(String),

    /// A register name that does not exist.
    #[error("unknown register '{0}'")]
    UnknownRegister(String),

    /// An identifier with no matching symbol.
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    /// Dereference of an address outside physical memory.
    #[error("cannot access memory at {0:#x}")]
    BadAddress(u64),
}

/// Failures from the watchpoint pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WatchpointError {
    /// Every slot is in use.
    #[error("no free watchpoint slot")]
    PoolExhausted,

    /// No active watchpoint carries this number.
    #[error("no watchpoint number {0}")]
    NotFound(usize),
}

/// Failures while loading a guest image or a symbol file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not a well-formed ELF object.
    #[error("malformed ELF: {0}")]
    Elf(#[from] object::read::Error),

    /// The ELF header describes something other than a little-endian RV64 executable.
    #[error("unsupported ELF: {0}")]
    Unsupported(&'static str),

    /// A segment or raw image does not fit in guest RAM.
    #[error("image range [{addr:#x}, {end:#x}) lies outside guest memory")]
    OutOfMemory {
        /// First byte of the range.
        addr: u64,
        /// One past the last byte of the range.
        end: u64,
    },
}

/// Failures while attaching the reference model.
#[derive(Debug, Error)]
pub enum DiffTestError {
    /// The shared library could not be opened.
    #[error("cannot load reference '{path}': {source}")]
    Library {
        /// Path of the shared library.
        path: PathBuf,
        /// Loader error.
        #[source]
        source: libloading::Error,
    },

    /// A required entry point is missing from the library.
    #[error("reference is missing symbol '{name}': {source}")]
    Symbol {
        /// Symbol name.
        name: &'static str,
        /// Loader error.
        #[source]
        source: libloading::Error,
    },

    /// Guest memory could not be mirrored into the reference.
    #[error("cannot copy guest memory to the reference: {0}")]
    Mem(#[from] MemError),
}

/// Fatal errors surfaced to the binary.
#[derive(Debug, Error)]
pub enum SimError {
    /// Image or symbol loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Reference model set-up failed.
    #[error(transparent)]
    DiffTest(#[from] DiffTestError),

    /// A watchpoint could not be created.
    #[error("watchpoint: {0}")]
    Watchpoint(#[from] WatchpointError),

    /// A memory access outside any backing store.
    #[error(transparent)]
    Mem(#[from] MemError),

    /// A guest trap the environment cannot service.
    #[error("unsupported trap at pc = {pc:#x} (a7 = {a7:#x}, mtvec = {mtvec:#x})")]
    UnsupportedTrap {
        /// Address of the `ecall`.
        pc: u64,
        /// Syscall selector register.
        a7: u64,
        /// Trap vector.
        mtvec: u64,
    },

    /// The configuration file could not be parsed.
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),

    /// Terminal or log I/O failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
