//! Run-state machine.
//!
//! The engine starts `Stopped`, enters `Running` for the duration of each `run` call and
//! leaves it for `Stopped` (budget exhausted), `Ended` (guest `ebreak`), `Aborted`
//! (invalid instruction, memory fault or reference divergence) or `Quit` (user request).
//! `Ended` and `Aborted` are terminal for the loaded program.

use std::fmt;

/// Execution state of the simulated program.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    /// Executing inside a `run` call.
    Running,
    /// Paused, waiting for the next command.
    #[default]
    Stopped,
    /// The guest halted itself.
    Ended,
    /// The run was cut short by a fault or a divergence.
    Aborted,
    /// The user asked to leave.
    Quit,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Ended => "ended",
            Self::Aborted => "aborted",
            Self::Quit => "quit",
        };
        f.write_str(s)
    }
}

/// Run state plus where and how the program stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimState {
    /// Current state.
    pub state: RunState,
    /// PC of the instruction that ended or aborted the run.
    pub halt_pc: u64,
    /// Exit value: `a0` at `ebreak`, or all ones on abort.
    pub halt_ret: u64,
}

impl SimState {
    /// Records a guest-requested halt.
    pub const fn end(&mut self, pc: u64, ret: u64) {
        self.state = RunState::Ended;
        self.halt_pc = pc;
        self.halt_ret = ret;
    }

    /// Records an abnormal stop.
    pub const fn abort(&mut self, pc: u64, ret: u64) {
        self.state = RunState::Aborted;
        self.halt_pc = pc;
        self.halt_ret = ret;
    }

    /// Whether the program can no longer be resumed.
    pub const fn is_finished(&self) -> bool {
        matches!(self.state, RunState::Ended | RunState::Aborted)
    }

    /// A good exit is a zero-valued halt or a user quit.
    pub const fn is_good_exit(&self) -> bool {
        match self.state {
            RunState::Ended => self.halt_ret == 0,
            RunState::Quit => true,
            _ => false,
        }
    }
}
