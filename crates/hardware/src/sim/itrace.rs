//! Instruction trace.
//!
//! Renders one line per retired instruction and keeps the most recent lines in a fixed
//! ring that is dumped after a failed run.

use std::io::{self, Write};

use crate::isa::disasm::disassemble;

/// Formats the trace line for `inst` at `pc`: address, encoding bytes (most significant
/// first) and disassembly.
///
/// ```
/// use rvsdb_core::sim::itrace::render;
///
/// assert_eq!(
///     render(0x8000_0000, 0x00A0_0513),
///     "0x0000000080000000: 00 a0 05 13  addi a0, zero, 10"
/// );
/// ```
pub fn render(pc: u64, inst: u32) -> String {
    let [b0, b1, b2, b3] = inst.to_le_bytes();
    format!(
        "{pc:#018x}: {b3:02x} {b2:02x} {b1:02x} {b0:02x}  {}",
        disassemble(pc, inst)
    )
}

/// Ring of the most recent trace lines.
#[derive(Clone, Debug)]
pub struct IRingBuf {
    entries: Vec<String>,
    capacity: usize,
    last: Option<usize>,
}

impl IRingBuf {
    /// Creates an empty ring holding at most `capacity` lines; 0 records nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            last: None,
        }
    }

    /// Records a line, overwriting the oldest once the ring is full.
    pub fn push(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        let idx = self.last.map_or(0, |i| (i + 1) % self.capacity);
        if idx < self.entries.len() {
            self.entries[idx] = line;
        } else {
            self.entries.push(line);
        }
        self.last = Some(idx);
    }

    /// The most recently recorded line.
    pub fn last(&self) -> Option<&str> {
        self.last.map(|i| self.entries[i].as_str())
    }

    /// Number of lines held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes every slot in ring order, marking the most recent with `-->`.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn dump(&self, out: &mut dyn Write) -> io::Result<()> {
        for (i, line) in self.entries.iter().enumerate() {
            let marker = if Some(i) == self.last { "-->" } else { "   " };
            writeln!(out, "{marker} {line}")?;
        }
        Ok(())
    }
}
