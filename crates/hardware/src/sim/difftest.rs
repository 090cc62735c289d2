//! Differential testing against a reference model.
//!
//! After every retired instruction the reference executes the same instruction and its
//! architectural state is compared with ours:
//! 1. **Protocol:** [`RefModel`] is the five-call interface every reference implements.
//! 2. **Shared library:** [`DylibRef`] binds the `difftest_*` entry points of a reference
//!    built as a shared object.
//! 3. **In-process:** [`InterpRef`] runs a second, independent copy of the interpreter.
//! 4. **Checker:** [`DiffTest`] drives the reference one step at a time. A step that
//!    touched a device is not replayed; our registers are copied into the reference
//!    instead.

use std::ffi::{c_int, c_void};
use std::fmt;
use std::path::Path;

use libloading::Library;
use tracing::{info, warn};

use crate::common::data::{AccessType, Width};
use crate::common::error::{DiffTestError, MemError};
use crate::core::{Cpu, Decode};
use crate::isa::abi;
use crate::soc::{Bus, Memory};

/// Register state exchanged with a reference, laid out for the C ABI.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffContext {
    /// General-purpose registers.
    pub gpr: [u64; 32],
    /// Program counter.
    pub pc: u64,
    /// Machine status.
    pub mstatus: u64,
    /// Machine trap cause.
    pub mcause: u64,
    /// Machine exception PC.
    pub mepc: u64,
    /// Machine trap vector.
    pub mtvec: u64,
}

impl DiffContext {
    /// Captures the compared state of `cpu`.
    pub fn from_cpu(cpu: &Cpu) -> Self {
        Self {
            gpr: cpu.gpr.snapshot(),
            pc: cpu.pc,
            mstatus: cpu.csrs.mstatus,
            mcause: cpu.csrs.mcause,
            mepc: cpu.csrs.mepc,
            mtvec: cpu.csrs.mtvec,
        }
    }

    /// Installs this state into `cpu`.
    pub fn apply(&self, cpu: &mut Cpu) {
        cpu.gpr.restore(&self.gpr);
        cpu.pc = self.pc;
        cpu.csrs.mstatus = self.mstatus;
        cpu.csrs.mcause = self.mcause;
        cpu.csrs.mepc = self.mepc;
        cpu.csrs.mtvec = self.mtvec;
    }

    /// Lists every field where `dut` differs from `self` (the reference).
    pub fn mismatches(&self, dut: &Self) -> Vec<Mismatch> {
        let gprs = self
            .gpr
            .iter()
            .zip(dut.gpr.iter())
            .enumerate()
            .map(|(i, (&r, &d))| (abi::name(i), r, d));
        let others = [
            ("pc", self.pc, dut.pc),
            ("mcause", self.mcause, dut.mcause),
            ("mstatus", self.mstatus, dut.mstatus),
            ("mepc", self.mepc, dut.mepc),
            ("mtvec", self.mtvec, dut.mtvec),
        ];
        gprs.chain(others)
            .filter(|&(_, r, d)| r != d)
            .map(|(name, reference, dut)| Mismatch {
                name,
                reference,
                dut,
            })
            .collect()
    }
}

/// One differing register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// Register name.
    pub name: &'static str,
    /// Value held by the reference.
    pub reference: u64,
    /// Value held by the simulator under test.
    pub dut: u64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is different: ref = {:#018x}, dut = {:#018x}",
            self.name, self.reference, self.dut
        )
    }
}

/// Interface of a reference model.
pub trait RefModel {
    /// Copies `bytes` into the reference's memory at `addr`.
    ///
    /// # Errors
    ///
    /// [`DiffTestError::Mem`] if the range is outside the reference's memory.
    fn memcpy_to_ref(&mut self, addr: u64, bytes: &[u8]) -> Result<(), DiffTestError>;

    /// Overwrites the reference's registers.
    fn regcpy_to_ref(&mut self, ctx: &DiffContext);

    /// Reads the reference's registers.
    fn regcpy_from_ref(&mut self) -> DiffContext;

    /// Executes `n` instructions.
    fn exec(&mut self, n: u64);

    /// Raises trap `no` in the reference.
    fn raise_intr(&mut self, no: u64);
}

type InitFn = unsafe extern "C" fn(c_int);
type MemcpyFn = unsafe extern "C" fn(u64, *mut c_void, usize, bool);
type RegcpyFn = unsafe extern "C" fn(*mut c_void, bool);
type ExecFn = unsafe extern "C" fn(u64);
type RaiseIntrFn = unsafe extern "C" fn(u64);

const TO_REF: bool = true;
const TO_DUT: bool = false;

/// A reference model loaded from a shared library.
pub struct DylibRef {
    memcpy: MemcpyFn,
    regcpy: RegcpyFn,
    exec: ExecFn,
    raise_intr: RaiseIntrFn,
    /// Keeps the entry points above mapped.
    _lib: Library,
}

impl fmt::Debug for DylibRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DylibRef").finish_non_exhaustive()
    }
}

impl DylibRef {
    /// Opens the library at `path`, resolves its entry points and calls
    /// `difftest_init(port)`.
    ///
    /// # Errors
    ///
    /// [`DiffTestError::Library`] if the library cannot be opened and
    /// [`DiffTestError::Symbol`] if an entry point is missing.
    pub fn open(path: &Path, port: u16) -> Result<Self, DiffTestError> {
        // SAFETY: loading runs the library's initialisers; the caller chose the file.
        let lib = unsafe { Library::new(path) }.map_err(|source| DiffTestError::Library {
            path: path.to_path_buf(),
            source,
        })?;

        let init: InitFn = symbol(&lib, "difftest_init")?;
        let memcpy: MemcpyFn = symbol(&lib, "difftest_memcpy")?;
        let regcpy: RegcpyFn = symbol(&lib, "difftest_regcpy")?;
        let exec: ExecFn = symbol(&lib, "difftest_exec")?;
        let raise_intr: RaiseIntrFn = symbol(&lib, "difftest_raise_intr")?;

        // SAFETY: signature fixed by the reference protocol.
        unsafe { init(c_int::from(port)) };
        info!("differential testing: ON, reference = {}", path.display());

        Ok(Self {
            memcpy,
            regcpy,
            exec,
            raise_intr,
            _lib: lib,
        })
    }
}

fn symbol<T: Copy>(lib: &Library, name: &'static str) -> Result<T, DiffTestError> {
    let mut cname = name.as_bytes().to_vec();
    cname.push(0);
    // SAFETY: `T` is one of the protocol's function pointer types.
    unsafe { lib.get::<T>(&cname) }
        .map(|sym| *sym)
        .map_err(|source| DiffTestError::Symbol { name, source })
}

impl RefModel for DylibRef {
    fn memcpy_to_ref(&mut self, addr: u64, bytes: &[u8]) -> Result<(), DiffTestError> {
        // SAFETY: the reference only reads `bytes.len()` bytes when copying to itself.
        unsafe { (self.memcpy)(addr, bytes.as_ptr().cast_mut().cast(), bytes.len(), TO_REF) };
        Ok(())
    }

    fn regcpy_to_ref(&mut self, ctx: &DiffContext) {
        let mut ctx = *ctx;
        // SAFETY: `DiffContext` matches the reference's register layout.
        unsafe { (self.regcpy)((&raw mut ctx).cast(), TO_REF) };
    }

    fn regcpy_from_ref(&mut self) -> DiffContext {
        let mut ctx = DiffContext::default();
        // SAFETY: `DiffContext` matches the reference's register layout.
        unsafe { (self.regcpy)((&raw mut ctx).cast(), TO_DUT) };
        ctx
    }

    fn exec(&mut self, n: u64) {
        // SAFETY: plain value argument.
        unsafe { (self.exec)(n) };
    }

    fn raise_intr(&mut self, no: u64) {
        // SAFETY: plain value argument.
        unsafe { (self.raise_intr)(no) };
    }
}

/// A reference model running a private copy of the interpreter.
///
/// It has RAM only: device accesses are never replayed on a reference.
#[derive(Debug)]
pub struct InterpRef {
    cpu: Cpu,
    bus: Bus,
}

impl InterpRef {
    /// Creates a reference with `size` bytes of RAM at `base`.
    pub fn new(base: u64, size: u64) -> Self {
        let mut cpu = Cpu::new();
        cpu.pc = base;
        Self {
            cpu,
            bus: Bus::new(Memory::new(base, size)),
        }
    }

    /// The reference's hart.
    pub const fn cpu(&self) -> &Cpu {
        &self.cpu
    }
}

impl RefModel for InterpRef {
    fn memcpy_to_ref(&mut self, addr: u64, bytes: &[u8]) -> Result<(), DiffTestError> {
        self.bus
            .ram_mut()
            .load(addr, bytes)
            .ok_or(DiffTestError::Mem(MemError::OutOfBound {
                addr,
                width: Width::Byte,
                access: AccessType::Write,
            }))
    }

    fn regcpy_to_ref(&mut self, ctx: &DiffContext) {
        ctx.apply(&mut self.cpu);
    }

    fn regcpy_from_ref(&mut self) -> DiffContext {
        DiffContext::from_cpu(&self.cpu)
    }

    fn exec(&mut self, n: u64) {
        for _ in 0..n {
            let mut s = Decode::new(self.cpu.pc);
            if let Err(e) = self.cpu.exec_once(&mut self.bus, &mut s) {
                warn!("reference stopped: {e}");
                break;
            }
        }
    }

    fn raise_intr(&mut self, no: u64) {
        let pc = self.cpu.pc;
        self.cpu.pc = self.cpu.csrs.raise_intr(no, pc);
    }
}

/// Step-by-step comparison against a reference.
pub struct DiffTest {
    model: Box<dyn RefModel>,
}

impl fmt::Debug for DiffTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffTest").finish_non_exhaustive()
    }
}

impl DiffTest {
    /// Wraps a reference model.
    pub fn new(model: Box<dyn RefModel>) -> Self {
        Self { model }
    }

    /// Mirrors `size` bytes of guest memory from `start` and the registers of `cpu`
    /// into the reference.
    ///
    /// # Errors
    ///
    /// [`DiffTestError::Mem`] if the range is outside guest RAM or the reference's memory.
    pub fn init(&mut self, ram: &Memory, start: u64, size: u64, cpu: &Cpu) -> Result<(), DiffTestError> {
        let bytes = ram.slice(start, size as usize).ok_or(MemError::OutOfBound {
            addr: start,
            width: Width::Byte,
            access: AccessType::Read,
        })?;
        self.model.memcpy_to_ref(start, bytes)?;
        self.model.regcpy_to_ref(&DiffContext::from_cpu(cpu));
        Ok(())
    }

    /// Checks the instruction at `pc` that has just retired on `cpu`.
    ///
    /// With `skip_ref` the reference is resynchronised from `cpu` instead of stepped.
    /// Returns the differing registers; empty means the states agree.
    pub fn step(&mut self, cpu: &Cpu, pc: u64, skip_ref: bool) -> Vec<Mismatch> {
        let dut = DiffContext::from_cpu(cpu);
        if skip_ref {
            self.model.regcpy_to_ref(&dut);
            return Vec::new();
        }
        self.model.exec(1);
        let reference = self.model.regcpy_from_ref();
        let diff = reference.mismatches(&dut);
        for m in &diff {
            warn!(pc = format_args!("{pc:#x}"), "{m}");
        }
        diff
    }

    /// Raises trap `no` in the reference.
    pub fn raise_intr(&mut self, no: u64) {
        self.model.raise_intr(no);
    }
}
