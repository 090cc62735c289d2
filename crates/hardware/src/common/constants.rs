//! Global System Constants.
//!
//! This module defines system-wide constants used across the simulator. It includes:
//! 1. **Memory Map:** Guest RAM placement and the MMIO window of the built-in devices.
//! 2. **Instruction Constants:** Instruction width and field masks.
//! 3. **Reset State:** Architectural values installed when an image is loaded.
//! 4. **Trace Constants:** Print thresholds and ring sizes for the run loop.

/// Physical base address of guest RAM; also the reset vector.
pub const RAM_BASE: u64 = 0x8000_0000;

/// Default size of guest RAM in bytes (128 MiB).
pub const RAM_SIZE: u64 = 128 * 1024 * 1024;

/// Program counter installed on reset.
pub const RESET_VECTOR: u64 = RAM_BASE;

/// MMIO address of the serial port's data register.
pub const SERIAL_MMIO: u64 = 0xa000_03f8;

/// MMIO address of the real-time clock (two 32-bit words, low word first).
pub const RTC_MMIO: u64 = 0xa000_0048;

/// Size of a standard (32-bit) RISC-V instruction in bytes.
pub const INSTRUCTION_SIZE_32: u64 = 4;

/// Bit mask for extracting the opcode field from a RISC-V instruction.
pub const OPCODE_MASK: u32 = 0x7F;

/// Bit mask for extracting the destination register (rd) field.
pub const RD_MASK: u32 = 0x1F;

/// Bit position shift for the destination register (rd) field.
pub const RD_SHIFT: u32 = 7;

/// Bit mask for extracting the first source register (rs1) field.
pub const RS1_MASK: u32 = 0x1F;

/// Bit position shift for the first source register (rs1) field.
pub const RS1_SHIFT: u32 = 15;

/// `mstatus` after reset: MPP = M, UXL = SXL = 64.
pub const MSTATUS_RESET: u64 = 0xa_0000_1800;

/// Runs with a budget below this many instructions echo every retired instruction.
pub const MAX_INST_TO_PRINT: u64 = 10;

/// Number of entries kept by the instruction ring buffer.
pub const IRINGBUF_SIZE: usize = 32;

/// Number of watchpoint slots in the pool.
pub const NR_WP: usize = 32;

/// Default port handed to the reference model's `difftest_init`.
pub const DIFFTEST_PORT: u16 = 1234;

/// Exit value recorded when the run aborts.
pub const ABORT_RET: u64 = u64::MAX;
