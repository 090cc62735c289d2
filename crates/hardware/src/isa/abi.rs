//! RISC-V Application Binary Interface (ABI) register names.
//!
//! Defines the ABI register indices the engine and the tracers single out, the
//! ABI name table, and name-to-index lookup for the debugger.

/// Register x0 (zero register, always zero).
pub const REG_ZERO: usize = 0;
/// Register x1 (return address, ra).
pub const REG_RA: usize = 1;
/// Register x10 (first argument/return value, a0).
pub const REG_A0: usize = 10;
/// Register x17 (system call number, a7).
pub const REG_A7: usize = 17;

/// ABI names for x0-x31.
pub const REG_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Returns the ABI name of register `idx`.
#[inline]
pub fn name(idx: usize) -> &'static str {
    REG_NAMES.get(idx).copied().unwrap_or("x??")
}

/// Resolves a register name to its index.
///
/// Accepts ABI names (`a0`, `sp`), `fp` for `s0`, architectural names (`x5`), and the
/// bare index `0` for the zero register.
pub fn index(name: &str) -> Option<usize> {
    if let Some(idx) = REG_NAMES.iter().position(|&n| n == name) {
        return Some(idx);
    }
    match name {
        "0" => return Some(REG_ZERO),
        "fp" => return Some(8),
        _ => {}
    }
    let num = name.strip_prefix('x')?;
    if num.is_empty() || (num.len() > 1 && num.starts_with('0')) {
        return None;
    }
    num.parse::<usize>().ok().filter(|&i| i < 32)
}
