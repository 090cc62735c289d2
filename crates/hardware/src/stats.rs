//! Simulation statistics collection and reporting.
//!
//! This module tracks the run-level metrics reported when a program ends or the user quits:
//! 1. **Host time:** Wall-clock microseconds spent inside the run loop, accumulated over
//!    every `run` call.
//! 2. **Guest instructions:** The monotonic count of retired instructions.
//! 3. **Frequency:** Instructions per host second, when the run was long enough to measure.

use std::io::{self, Write};
use std::time::Duration;

/// Run-level statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Host wall-clock time spent executing guest instructions.
    pub host_time: Duration,
    /// Number of guest instructions retired.
    pub instructions_retired: u64,
}

impl SimStats {
    /// Host time in whole microseconds.
    pub fn host_us(&self) -> u64 {
        u64::try_from(self.host_time.as_micros()).unwrap_or(u64::MAX)
    }

    /// Simulation frequency in instructions per second, or `None` when less than one
    /// microsecond of host time has been recorded.
    pub fn frequency(&self) -> Option<u64> {
        let us = self.host_us();
        if us == 0 {
            return None;
        }
        let freq = u128::from(self.instructions_retired) * 1_000_000 / u128::from(us);
        Some(u64::try_from(freq).unwrap_or(u64::MAX))
    }

    /// Writes the statistics report.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn print(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "host time spent = {} us", self.host_us())?;
        writeln!(out, "total guest instructions = {}", self.instructions_retired)?;
        match self.frequency() {
            Some(freq) => writeln!(out, "simulation frequency = {freq} inst/s"),
            None => writeln!(
                out,
                "Finish running in less than 1 us and can not calculate the simulation frequency"
            ),
        }
    }
}
