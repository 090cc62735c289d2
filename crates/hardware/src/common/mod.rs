//! Common utilities and types used throughout the simulator.
//!
//! This module provides the building blocks shared by the engine, the tracers and the
//! debugger. It includes:
//! 1. **Constants:** Memory map, reset values, and trace thresholds.
//! 2. **Memory Access:** Access widths and access classification.
//! 3. **Error Handling:** The error enums every fallible operation returns.

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access width and type definitions.
pub mod data;

/// Error types for memory, loading, execution, expressions, and difftest.
pub mod error;

pub use data::{AccessType, Width};
pub use error::{
    DiffTestError, ExecError, ExprError, LoadError, MemError, SimError, WatchpointError,
};
