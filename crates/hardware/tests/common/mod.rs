//! Shared test infrastructure.

/// Fluent instruction encoder.
pub mod builder;


/// Simulator harness.
pub mod harness;

pub use builder::InstructionBuilder;
pub use elf::ElfBuilder;
pub use harness::TestContext;
