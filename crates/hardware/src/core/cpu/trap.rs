//! Trap Handling Logic.
//!
//! The hart only ever takes synchronous traps from `ecall`. Entry goes through
//! [`Csrs::raise_intr`] with cause 11 and `epc = pc`; the guest's trap glue dispatches on
//! `a7` (`-1` is a yield, non-negative values are syscall numbers) and advances `mepc`
//! before `mret`. A selector outside that range, or a trap with no vector installed,
//! cannot be serviced and is reported as [`ExecError::UnsupportedTrap`].
//!
//! [`Csrs::raise_intr`]: crate::core::arch::csr::Csrs::raise_intr

use tracing::debug;

use super::Cpu;
use crate::common::error::ExecError;
use crate::isa::abi;
use crate::isa::privileged::cause;

impl Cpu {
    /// Executes `ecall`; returns the trap vector the hart continues at.
    pub(super) fn exec_ecall(&mut self, pc: u64) -> Result<u64, ExecError> {
        let a7 = self.gpr.read(abi::REG_A7);
        let mtvec = self.csrs.mtvec;
        if mtvec == 0 || (a7 as i64) < -1 {
            return Err(ExecError::UnsupportedTrap { pc, a7, mtvec });
        }
        debug!(pc = format_args!("{pc:#x}"), a7 = a7 as i64, "ecall");
        Ok(self.csrs.raise_intr(cause::ENVIRONMENT_CALL_FROM_M_MODE, pc))
    }

    /// Executes `mret`; returns the saved exception PC.
    pub(super) const fn exec_mret(&mut self) -> u64 {
        self.csrs.mret()
    }
}
