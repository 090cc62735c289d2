//! RISC-V architecture-specific components.
//!
//! This module contains the architectural state of the simulated hart.
//! It includes the following modules:
//! 1. **CSRs:** Control and Status Register definitions and access logic.
//! 2. **GPRs:** General-Purpose Register file implementation.
//! 3. **Traps:** Machine-mode trap entry, return, and interrupt polling.

/// Control and Status Register (CSR) definitions and access logic.
pub mod csr;

/// General-Purpose Register file implementation.
pub mod gpr;

/// Trap entry and return on the CSR file.
pub mod trap;
