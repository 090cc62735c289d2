use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rvsdb_core::Cpu;
use rvsdb_core::common::error::DiffTestError;
use rvsdb_core::isa::abi::REG_A0;
use rvsdb_core::sim::RunState;
use rvsdb_core::sim::difftest::{DiffContext, DiffTest, InterpRef, Mismatch, RefModel};
use rvsdb_core::soc::Memory;

use crate::common::harness::TEST_RAM_SIZE;
use crate::common::{InstructionBuilder, TestContext};

const BASE: u64 = 0x8000_0000;

/// Forwards to an interpreter but corrupts `a0` once `corrupt_after` steps have run.
struct Corrupting {
    inner: InterpRef,
    steps: u64,
    corrupt_after: u64,
}

impl RefModel for Corrupting {
    fn memcpy_to_ref(&mut self, addr: u64, bytes: &[u8]) -> Result<(), DiffTestError> {
        self.inner.memcpy_to_ref(addr, bytes)
    }

    fn regcpy_to_ref(&mut self, ctx: &DiffContext) {
        self.inner.regcpy_to_ref(ctx);
    }

    fn regcpy_from_ref(&mut self) -> DiffContext {
        let mut ctx = self.inner.regcpy_from_ref();
        if self.steps >= self.corrupt_after {
            ctx.gpr[REG_A0] ^= 1;
        }
        ctx
    }

    fn exec(&mut self, n: u64) {
        self.steps += n;
        self.inner.exec(n);
    }

    fn raise_intr(&mut self, no: u64) {
        self.inner.raise_intr(no);
    }
}

/// Records the calls it receives.
#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<String>>>);

impl RefModel for Recorder {
    fn memcpy_to_ref(&mut self, addr: u64, bytes: &[u8]) -> Result<(), DiffTestError> {
        self.0
            .borrow_mut()
            .push(format!("memcpy {addr:#x} {}", bytes.len()));
        Ok(())
    }

    fn regcpy_to_ref(&mut self, ctx: &DiffContext) {
        self.0.borrow_mut().push(format!("regcpy_to_ref {:#x}", ctx.pc));
    }

    fn regcpy_from_ref(&mut self) -> DiffContext {
        self.0.borrow_mut().push("regcpy_from_ref".into());
        DiffContext::default()
    }

    fn exec(&mut self, n: u64) {
        self.0.borrow_mut().push(format!("exec {n}"));
    }

    fn raise_intr(&mut self, no: u64) {
        self.0.borrow_mut().push(format!("raise_intr {no}"));
    }
}

#[test]
fn test_clean_run_against_interpreter() {
    let mut ctx = TestContext::new();
    ctx.sim
        .attach_difftest(Box::new(InterpRef::new(BASE, TEST_RAM_SIZE)))
        .unwrap();
    ctx.run_to_end();

    assert_eq!(ctx.state(), RunState::Ended);
    assert!(ctx.sim.state.is_good_exit());
    assert!(!ctx.output().contains("is different"));
}

#[test]
fn test_trap_program_against_interpreter() {
    let ib = InstructionBuilder::new;
    let program = [
        ib().auipc(5, 0).build(),
        ib().addi(5, 5, 20).build(),
        ib().csrrw(0, 0x305, 5).build(),
        ib().ecall().build(),
        ib().ebreak().build(),
        // handler: skip the ecall
        ib().csrrs(6, 0x341, 0).build(),
        ib().addi(6, 6, 4).build(),
        ib().csrrw(0, 0x341, 6).build(),
        ib().mret().build(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    ctx.sim
        .attach_difftest(Box::new(InterpRef::new(BASE, TEST_RAM_SIZE)))
        .unwrap();
    ctx.run_to_end();
    assert!(ctx.sim.state.is_good_exit(), "{}", ctx.output());
}

#[test]
fn test_interrupt_is_mirrored_to_reference() {
    let ib = InstructionBuilder::new;
    let program = [
        ib().auipc(5, 0).build(),
        ib().addi(5, 5, 0x24).build(),
        ib().csrrw(0, 0x305, 5).build(),
        ib().addi(6, 0, 0x80).build(),
        ib().csrrw(0, 0x304, 6).build(),
        ib().csrrw(0, 0x344, 6).build(),
        ib().addi(7, 0, 8).build(),
        ib().csrrs(0, 0x300, 7).build(),
        ib().ebreak().build(),
        // handler
        ib().ebreak().build(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    ctx.sim
        .attach_difftest(Box::new(InterpRef::new(BASE, TEST_RAM_SIZE)))
        .unwrap();
    ctx.run_to_end();
    assert_eq!(ctx.state(), RunState::Ended, "{}", ctx.output());
    assert_eq!(ctx.sim.state.halt_pc, BASE + 0x24);
}

#[test]
fn test_divergence_aborts() {
    let mut ctx = TestContext::new();
    ctx.sim
        .attach_difftest(Box::new(Corrupting {
            inner: InterpRef::new(BASE, TEST_RAM_SIZE),
            steps: 0,
            corrupt_after: 3,
        }))
        .unwrap();
    ctx.run_to_end();

    assert_eq!(ctx.state(), RunState::Aborted);
    assert_eq!(ctx.sim.state.halt_pc, BASE + 8);
    assert_eq!(ctx.sim.stats.instructions_retired, 3);
    let out = ctx.output();
    assert!(out.contains(
        "a0 is different: ref = 0x0000000000000001, dut = 0x0000000000000000\n"
    ));
    assert!(out.contains("rvsdb: ABORT at pc = 0x0000000080000008\n"));
}

#[test]
fn test_init_mirrors_image_and_registers() {
    let log = Recorder::default();
    let mut ctx = TestContext::new();
    ctx.sim.attach_difftest(Box::new(log.clone())).unwrap();
    assert_eq!(
        *log.0.borrow(),
        ["memcpy 0x80000000 4096", "regcpy_to_ref 0x80000000"]
    );
}

#[test]
fn test_init_outside_ram() {
    let ram = Memory::new(BASE, 0x100);
    let mut dt = DiffTest::new(Box::new(Recorder::default()));
    let err = dt.init(&ram, BASE, 0x200, &Cpu::new()).unwrap_err();
    assert!(matches!(err, DiffTestError::Mem(_)));
}

#[test]
fn test_step_skips_reference_after_device_access() {
    let log = Recorder::default();
    let mut dt = DiffTest::new(Box::new(log.clone()));
    let mut cpu = Cpu::new();
    cpu.pc = BASE + 4;

    assert!(dt.step(&cpu, BASE, true).is_empty());
    assert_eq!(*log.0.borrow(), ["regcpy_to_ref 0x80000004"]);

    log.0.borrow_mut().clear();
    // The recorder reports an all-zero state, so `pc` and `mstatus` differ.
    let diff = dt.step(&cpu, BASE, false);
    assert_eq!(*log.0.borrow(), ["exec 1", "regcpy_from_ref"]);
    let names: Vec<_> = diff.iter().map(|m| m.name).collect();
    assert_eq!(names, ["pc", "mstatus"]);

    dt.raise_intr(11);
    assert_eq!(log.0.borrow().last().map(String::as_str), Some("raise_intr 11"));
}

#[test]
fn test_mismatches() {
    let cpu = Cpu::new();
    let reference = DiffContext::from_cpu(&cpu);
    let mut dut = reference;
    assert!(reference.mismatches(&dut).is_empty());

    dut.gpr[2] = 0x10;
    dut.mepc = 0x20;
    assert_eq!(
        reference.mismatches(&dut),
        vec![
            Mismatch {
                name: "sp",
                reference: 0,
                dut: 0x10,
            },
            Mismatch {
                name: "mepc",
                reference: 0,
                dut: 0x20,
            },
        ]
    );
    assert_eq!(
        Mismatch {
            name: "pc",
            reference: 4,
            dut: 8,
        }
        .to_string(),
        "pc is different: ref = 0x0000000000000004, dut = 0x0000000000000008"
    );
}

#[test]
fn test_context_round_trip_through_cpu() {
    let mut cpu = Cpu::new();
    cpu.gpr.write(REG_A0, 7);
    cpu.csrs.mtvec = 0x8000_0100;
    let ctx = DiffContext::from_cpu(&cpu);

    let mut other = Cpu::new();
    ctx.apply(&mut other);
    assert_eq!(other, cpu);
}

#[test]
fn test_interpreter_raise_intr() {
    let mut r = InterpRef::new(BASE, 0x100);
    let mut ctx = r.regcpy_from_ref();
    ctx.mtvec = BASE + 0x40;
    r.regcpy_to_ref(&ctx);
    r.raise_intr(11);
    assert_eq!(r.cpu().pc, BASE + 0x40);
    assert_eq!(r.cpu().csrs.mepc, BASE);
    assert_eq!(r.cpu().csrs.mcause, 11);
}
