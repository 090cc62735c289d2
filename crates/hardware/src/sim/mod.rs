//! Simulation engine and its observers.
//!
//! This module drives the hart and checks what it does:
//! 1. **Engine:** The run loop and its state machine ([`simulator`], [`state`]).
//! 2. **Loading:** Guest images and function symbols ([`loader`], [`symbols`]).
//! 3. **Tracing:** Instruction ring and call/return trace ([`itrace`], [`ftrace`]).
//! 4. **Checking:** Lock-step comparison with a reference model ([`difftest`]).

/// Differential testing against a reference model.
pub mod difftest;

/// Function call and return tracing.
pub mod ftrace;

/// Instruction trace lines and ring buffer.
pub mod itrace;

/// Raw and ELF image loading.
pub mod loader;

/// The run loop.
pub mod simulator;

/// Run-state machine.
pub mod state;

/// ELF function symbols.
pub mod symbols;

pub use simulator::{MachineView, Simulator};
pub use state::{RunState, SimState};
