//! System-on-Chip (SoC) Components.
//!
//! This module organizes the components that make up the simulated system:
//! the system bus, guest RAM, and memory-mapped devices.

/// Memory-mapped I/O device implementations.
pub mod devices;

/// System bus interconnect and routing.
pub mod interconnect;

/// Guest physical memory.
pub mod memory;

/// Device trait definitions for MMIO access.
pub mod traits;

pub use interconnect::Bus;
pub use memory::Memory;
