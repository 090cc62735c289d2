//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline values for guest memory, tracing and the reference model.
//! 2. **Structures:** Hierarchical config for general, memory, trace and difftest settings.
//! 3. **Parsing:** [`Config::from_json`] for configuration files.
//!
//! Every field is optional in the JSON document; missing fields take the values in
//! [`defaults`]. Command-line flags are applied on top of the parsed file by the binary.

use std::path::PathBuf;

use serde::Deserialize;

use crate::common::error::SimError;

/// Default configuration constants for the simulator.
mod defaults {
    use crate::common::constants;

    /// Base address of guest RAM; also the reset vector.
    pub const RAM_BASE: u64 = constants::RAM_BASE;

    /// Size of guest RAM (128 MiB).
    pub const RAM_SIZE: u64 = constants::RAM_SIZE;

    /// Runs shorter than this echo every retired instruction.
    pub const MAX_INST_TO_PRINT: u64 = constants::MAX_INST_TO_PRINT;

    /// Capacity of the instruction ring buffer.
    pub const IRINGBUF_SIZE: usize = constants::IRINGBUF_SIZE;

    /// Port handed to the reference model.
    pub const DIFFTEST_PORT: u16 = constants::DIFFTEST_PORT;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use rvsdb_core::Config;
///
/// let json = r#"{
///     "general": { "batch": true },
///     "memory": { "size": 1048576 },
///     "trace": { "ftrace": false }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.batch);
/// assert_eq!(config.memory.base, 0x8000_0000);
/// assert_eq!(config.memory.size, 1 << 20);
/// assert!(!config.trace.ftrace);
/// assert!(config.trace.itrace);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General run settings.
    pub general: GeneralConfig,
    /// Guest memory layout.
    pub memory: MemoryConfig,
    /// Instruction, call and watchpoint tracing.
    pub trace: TraceConfig,
    /// Differential testing.
    pub difftest: DiffTestConfig,
}

impl Config {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] if the document is not valid JSON or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// General run settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Run the program to completion without entering the command loop.
    pub batch: bool,

    /// Runs with a budget below this value echo each retired instruction.
    pub max_inst_to_print: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            batch: false,
            max_inst_to_print: defaults::MAX_INST_TO_PRINT,
        }
    }
}

/// Guest physical memory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Physical base address of RAM; raw images are loaded here.
    pub base: u64,

    /// Size of RAM in bytes.
    pub size: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: defaults::RAM_BASE,
            size: defaults::RAM_SIZE,
        }
    }
}

/// Tracing switches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Keep the instruction ring buffer and echo short runs.
    pub itrace: bool,

    /// Capacity of the instruction ring buffer.
    pub iringbuf_size: usize,

    /// Trace calls and returns when a symbol file is loaded.
    pub ftrace: bool,

    /// Poll watchpoints after every step.
    pub watchpoints: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            itrace: true,
            iringbuf_size: defaults::IRINGBUF_SIZE,
            ftrace: true,
            watchpoints: true,
        }
    }
}

/// Reference model attachment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiffTestConfig {
    /// Shared library implementing the reference protocol.
    pub ref_so: Option<PathBuf>,

    /// Port handed to `difftest_init`.
    pub port: u16,
}

impl Default for DiffTestConfig {
    fn default() -> Self {
        Self {
            ref_so: None,
            port: defaults::DIFFTEST_PORT,
        }
    }
}
