//! Function call tracer.
//!
//! Classifies retired control transfers and prints an indented call/return trace:
//!
//! | instruction                          | event     |
//! |--------------------------------------|-----------|
//! | `jal ra, f` / `jalr ra, ..`          | call      |
//! | `jalr x0, 0(ra)`                     | return    |
//! | `jalr x0, rs1` with `rs1 != ra`      | tail call |
//! | `jal x0, f` where `f` starts a func  | tail call |
//!
//! A tail call never sees its own return: the callee returns straight to the caller's
//! caller. The tracer therefore remembers the tail-call site together with the depth it
//! was made at, and when a return brings the depth back to that level it synthesises the
//! missing return of the function that made the tail call.

use tracing::info;

use crate::isa::abi::{REG_RA, REG_ZERO};
use crate::isa::decode::decode;
use crate::isa::rv64i::opcodes as i_op;
use crate::sim::symbols::SymbolTable;

/// Control-transfer kind of a retired instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transfer {
    /// Ordinary call; a return is expected.
    Call,
    /// Tail call; the callee returns on behalf of the caller.
    TailCall,
    /// Function return.
    Return,
}

/// Classifies the instruction `inst` at `pc` that continued at `dnpc`.
pub fn classify(inst: u32, dnpc: u64, symbols: &SymbolTable) -> Option<Transfer> {
    let d = decode(inst);
    match d.opcode {
        i_op::OP_JAL if d.rd == REG_RA => Some(Transfer::Call),
        i_op::OP_JAL if d.rd == REG_ZERO && symbols.is_func_start(dnpc) => {
            Some(Transfer::TailCall)
        }
        i_op::OP_JALR if d.rd == REG_RA => Some(Transfer::Call),
        i_op::OP_JALR if d.rd == REG_ZERO && d.rs1 == REG_RA && d.imm == 0 => {
            Some(Transfer::Return)
        }
        i_op::OP_JALR if d.rd == REG_ZERO && d.rs1 != REG_RA => Some(Transfer::TailCall),
        _ => None,
    }
}

/// Call depth and pending tail-call sites.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FuncTracer {
    depth: usize,
    /// `(tail-call site, depth at the call)`, most recent last.
    pending: Vec<(u64, usize)>,
}

impl FuncTracer {
    /// Creates a tracer at depth zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current call depth.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Number of tail calls still waiting for their synthetic return.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Traces one retired instruction; returns the events it produced.
    pub fn on_step(&mut self, symbols: &SymbolTable, pc: u64, inst: u32, dnpc: u64) -> Vec<String> {
        let mut events = Vec::new();
        match classify(inst, dnpc, symbols) {
            Some(Transfer::Call) => events.push(self.call(symbols, pc, dnpc, false)),
            Some(Transfer::TailCall) => events.push(self.call(symbols, pc, dnpc, true)),
            Some(Transfer::Return) => self.ret(symbols, pc, &mut events),
            None => {}
        }
        for ev in &events {
            info!(target: "ftrace", "{ev}");
        }
        events
    }

    /// Records a call from `pc` to `target`.
    pub fn call(&mut self, symbols: &SymbolTable, pc: u64, target: u64, tail: bool) -> String {
        let name = &symbols.lookup(target).name;
        let line = format!(
            "{pc:#010x}:{:indent$} call [{name}@{target:#010x}]",
            "",
            indent = self.depth
        );
        if tail {
            self.pending.push((pc, self.depth));
        }
        self.depth += 1;
        line
    }

    /// Records a return at `pc`, followed by any synthetic returns it completes.
    pub fn ret(&mut self, symbols: &SymbolTable, pc: u64, events: &mut Vec<String>) {
        let mut pc = pc;
        loop {
            self.depth = self.depth.saturating_sub(1);
            let name = &symbols.lookup(pc).name;
            events.push(format!(
                "{pc:#010x}:{:indent$} ret  [{name}]",
                "",
                indent = self.depth
            ));

            match self.pending.last() {
                Some(&(site, depth)) if depth == self.depth => {
                    let _ = self.pending.pop();
                    pc = site;
                }
                _ => break,
            }
        }
    }
}
