//! Trap Entry and Return.
//!
//! This module implements the machine-mode trap state transitions on [`Csrs`]:
//! 1. **Entry:** `raise_intr` records cause and EPC, stacks MIE, and yields the vector.
//! 2. **Return:** `mret` unstacks MIE and yields the saved EPC.
//! 3. **Polling:** `query_intr` reports a pending, enabled interrupt. The run loop polls
//!    it after every step.

use super::csr::{
    CAUSE_INTERRUPT_BIT, Csrs, MSTATUS_MIE, MSTATUS_MPIE, MSTATUS_MPP, MSTATUS_MPP_SHIFT, PRV_M,
    PRV_U,
};

impl Csrs {
    /// Enters a machine-mode trap.
    ///
    /// Sets `mepc = epc` and `mcause = cause`, moves MIE into MPIE, clears MIE, and sets
    /// MPP to machine mode.
    ///
    /// # Returns
    ///
    /// The trap vector (`mtvec`) the hart continues at.
    pub const fn raise_intr(&mut self, cause: u64, epc: u64) -> u64 {
        self.mepc = epc;
        self.mcause = cause;
        let mie = (self.mstatus & MSTATUS_MIE) != 0;
        let mut status = self.mstatus & !(MSTATUS_MIE | MSTATUS_MPIE | MSTATUS_MPP);
        if mie {
            status |= MSTATUS_MPIE;
        }
        status |= PRV_M << MSTATUS_MPP_SHIFT;
        self.mstatus = status;
        self.mtvec
    }

    /// Returns from a machine-mode trap.
    ///
    /// Moves MPIE into MIE, sets MPIE, and sets MPP to user mode. The guest is expected
    /// to have advanced `mepc` past the trapping instruction.
    ///
    /// # Returns
    ///
    /// The saved exception PC.
    pub const fn mret(&mut self) -> u64 {
        let mpie = (self.mstatus & MSTATUS_MPIE) != 0;
        let mut status = self.mstatus & !(MSTATUS_MIE | MSTATUS_MPP);
        if mpie {
            status |= MSTATUS_MIE;
        }
        status |= MSTATUS_MPIE;
        status |= PRV_U << MSTATUS_MPP_SHIFT;
        self.mstatus = status;
        self.mepc
    }

    /// Returns the cause of a pending interrupt when one is both pending and enabled.
    pub const fn query_intr(&self) -> Option<u64> {
        if self.mstatus & MSTATUS_MIE == 0 {
            return None;
        }
        let pending = self.mip & self.mie;
        if pending == 0 {
            return None;
        }
        Some(CAUSE_INTERRUPT_BIT | pending.trailing_zeros() as u64)
    }
}
