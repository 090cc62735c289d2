//! Memory Access Types.
//!
//! This module defines how memory accesses are classified throughout the simulator:
//! 1. **Width:** The byte count of a single load, store, or fetch.
//! 2. **Access Type:** Fetch, read, or write, used when reporting faults.

use std::fmt;

/// Width of a single memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    /// One byte.
    Byte,
    /// Two bytes (half-word).
    Half,
    /// Four bytes (word).
    Word,
    /// Eight bytes (double-word).
    Double,
}

impl Width {
    /// Number of bytes covered by an access of this width.
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
            Self::Double => 8,
        }
    }

    /// Mask selecting the low `bytes() * 8` bits of a value.
    #[inline]
    pub const fn mask(self) -> u64 {
        match self {
            Self::Double => u64::MAX,
            w => (1u64 << (w.bytes() * 8)) - 1,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytes())
    }
}

/// Type of memory access operation.
///
/// Used to distinguish between instruction fetches, data loads, and data stores
/// when a fault is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch access.
    Fetch,

    /// Data read access (loads and debugger reads).
    Read,

    /// Data write access (stores).
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fetch => "fetch",
            Self::Read => "read",
            Self::Write => "write",
        };
        f.write_str(s)
    }
}
