//! Simulator: the hart, the bus and everything that watches them.
//!
//! `Simulator` owns the architectural state, guest memory and devices, and the per-step
//! observers (instruction ring, differential tester, call tracer, watchpoints). The
//! debugger drives it through [`Simulator::run`].

use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::common::constants::ABORT_RET;
use crate::common::data::{AccessType, Width};
use crate::common::error::{ExecError, ExprError, MemError, SimError};
use crate::config::Config;
use crate::core::arch::csr::Csrs;
use crate::core::{Cpu, Decode, Retire};
use crate::debugger::expr::{ExprContext, evaluate};
use crate::debugger::watchpoint::WatchpointPool;
use crate::isa::abi;
use crate::sim::difftest::{DiffTest, RefModel};
use crate::sim::ftrace::FuncTracer;
use crate::sim::itrace::{IRingBuf, render};
use crate::sim::loader::{self, Image};
use crate::sim::state::{RunState, SimState};
use crate::sim::symbols::SymbolTable;
use crate::soc::{Bus, Memory};
use crate::stats::SimStats;

/// Read-only view of the machine used to evaluate debugger expressions.
#[derive(Clone, Copy, Debug)]
pub struct MachineView<'a> {
    /// The hart.
    pub cpu: &'a Cpu,
    /// Guest RAM.
    pub ram: &'a Memory,
    /// Function symbols, if loaded.
    pub symbols: Option<&'a SymbolTable>,
}

impl ExprContext for MachineView<'_> {
    fn reg(&self, name: &str) -> Option<u64> {
        if name == "pc" {
            return Some(self.cpu.pc);
        }
        if let Some(idx) = abi::index(name) {
            return Some(self.cpu.gpr.read(idx));
        }
        Csrs::lookup(name).and_then(|addr| self.cpu.csrs.read(addr))
    }

    fn read_mem(&self, addr: u64) -> Result<u64, ExprError> {
        self.ram
            .read(addr, Width::Double)
            .ok_or(ExprError::BadAddress(addr))
    }

    fn symbol(&self, name: &str) -> Option<u64> {
        self.symbols.and_then(|s| s.address_of(name))
    }
}

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator {
    /// Architectural state.
    pub cpu: Cpu,
    /// RAM and devices.
    pub bus: Bus,
    /// Run state.
    pub state: SimState,
    /// Run statistics.
    pub stats: SimStats,
    /// Watchpoint pool.
    pub watchpoints: WatchpointPool,
    config: Config,
    image: Image,
    iringbuf: IRingBuf,
    ftrace: FuncTracer,
    symbols: Option<SymbolTable>,
    difftest: Option<DiffTest>,
}

impl Simulator {
    /// Creates a simulator with the built-in image loaded.
    ///
    /// # Errors
    ///
    /// [`SimError::Load`] if the configured RAM cannot hold the built-in image.
    pub fn new(config: Config) -> Result<Self, SimError> {
        let mut ram = Memory::new(config.memory.base, config.memory.size);
        let image = loader::load_builtin(&mut ram)?;
        let mut cpu = Cpu::new();
        cpu.reset(image.entry);
        Ok(Self {
            cpu,
            bus: Bus::with_default_devices(ram),
            state: SimState::default(),
            stats: SimStats::default(),
            watchpoints: WatchpointPool::new(),
            iringbuf: IRingBuf::new(config.trace.iringbuf_size),
            ftrace: FuncTracer::new(),
            symbols: None,
            difftest: None,
            image,
            config,
        })
    }

    /// Active configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Where the current program was loaded.
    pub const fn image(&self) -> Image {
        self.image
    }

    /// Loads the program at `path` and resets the hart to its entry point.
    ///
    /// # Errors
    ///
    /// [`SimError::Load`] if the file cannot be read or does not fit.
    pub fn load_image(&mut self, path: &Path) -> Result<(), SimError> {
        let image = loader::load_file(self.bus.ram_mut(), path)?;
        self.install(image);
        Ok(())
    }

    /// Loads a program from memory and resets the hart to its entry point.
    ///
    /// # Errors
    ///
    /// [`SimError::Load`] if the bytes are a malformed ELF file or do not fit.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<(), SimError> {
        let image = loader::load_bytes(self.bus.ram_mut(), bytes)?;
        self.install(image);
        Ok(())
    }

    fn install(&mut self, image: Image) {
        self.image = image;
        self.cpu.reset(image.entry);
    }

    /// Loads function symbols from the ELF file at `path`.
    ///
    /// # Errors
    ///
    /// [`SimError::Load`] if the file cannot be read or parsed.
    pub fn load_symbols(&mut self, path: &Path) -> Result<(), SimError> {
        self.symbols = Some(SymbolTable::from_file(path)?);
        Ok(())
    }

    /// Installs a symbol table.
    pub fn set_symbols(&mut self, symbols: SymbolTable) {
        self.symbols = Some(symbols);
    }

    /// Loaded symbols, if any.
    pub const fn symbols(&self) -> Option<&SymbolTable> {
        self.symbols.as_ref()
    }

    /// The call tracer.
    pub const fn ftrace(&self) -> &FuncTracer {
        &self.ftrace
    }

    /// The instruction ring.
    pub const fn iringbuf(&self) -> &IRingBuf {
        &self.iringbuf
    }

    /// Attaches a reference model and mirrors the loaded image and registers into it.
    ///
    /// # Errors
    ///
    /// [`SimError::DiffTest`] if the image cannot be copied to the reference.
    pub fn attach_difftest(&mut self, model: Box<dyn RefModel>) -> Result<(), SimError> {
        let mut dt = DiffTest::new(model);
        dt.init(self.bus.ram(), self.image.start, self.image.size, &self.cpu)?;
        self.difftest = Some(dt);
        Ok(())
    }

    /// Read-only view for expression evaluation.
    pub fn view(&self) -> MachineView<'_> {
        MachineView {
            cpu: &self.cpu,
            ram: self.bus.ram(),
            symbols: self.symbols.as_ref(),
        }
    }

    /// Evaluates a debugger expression against the current state.
    ///
    /// # Errors
    ///
    /// Any [`ExprError`] from tokenizing or evaluating.
    pub fn eval(&self, expr: &str) -> Result<u64, ExprError> {
        evaluate(expr, &self.view())
    }

    /// Reads a 32-bit word of guest RAM.
    ///
    /// # Errors
    ///
    /// [`MemError::OutOfBound`] outside RAM.
    pub fn read_word(&self, addr: u64) -> Result<u32, MemError> {
        self.bus
            .ram()
            .read(addr, Width::Word)
            .map(|w| w as u32)
            .ok_or(MemError::OutOfBound {
                addr,
                width: Width::Word,
                access: AccessType::Read,
            })
    }

    /// Writes the register file, `pc` and the machine CSRs.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn dump_regs(&self, out: &mut dyn Write) -> io::Result<()> {
        self.cpu.gpr.dump(out)?;
        let pc = self.cpu.pc;
        writeln!(out, "{:<6}{pc:<#20x}{pc}", "pc")?;
        let c = &self.cpu.csrs;
        for (name, val) in [
            ("mstatus", c.mstatus),
            ("mtvec", c.mtvec),
            ("mepc", c.mepc),
            ("mcause", c.mcause),
        ] {
            writeln!(out, "{name:<8}{val:#x}")?;
        }
        Ok(())
    }

    /// Executes at most `n` instructions (`u64::MAX` runs until the program stops).
    ///
    /// User-facing output (short-run echo, watchpoint reports, verdict, statistics) goes
    /// to `out`.
    ///
    /// # Errors
    ///
    /// * [`SimError::UnsupportedTrap`] when the guest raises a trap nothing can service.
    /// * [`SimError::Io`] if writing to `out` fails.
    pub fn run(&mut self, n: u64, out: &mut dyn Write) -> Result<(), SimError> {
        if self.state.is_finished() {
            writeln!(
                out,
                "Program execution has ended. To restart the program, exit and run again."
            )?;
            return Ok(());
        }
        self.state.state = RunState::Running;

        let print_step = n < self.config.general.max_inst_to_print;
        let start = Instant::now();
        let result = self.execute(n, print_step, out);
        self.stats.host_time += start.elapsed();
        if let Err(err @ SimError::UnsupportedTrap { .. }) = result {
            self.dump_regs(out)?;
            self.stats.print(out)?;
            return Err(err);
        }
        result?;

        match self.state.state {
            RunState::Running => self.state.state = RunState::Stopped,
            RunState::Ended | RunState::Aborted => {
                if self.config.trace.itrace
                    && (self.state.state == RunState::Aborted || self.state.halt_ret != 0)
                {
                    self.iringbuf.dump(out)?;
                }
                let verdict = match self.state.state {
                    RunState::Aborted => "ABORT",
                    _ if self.state.halt_ret == 0 => "HIT GOOD TRAP",
                    _ => "HIT BAD TRAP",
                };
                let pc = self.state.halt_pc;
                info!("{verdict} at pc = {pc:#018x}");
                writeln!(out, "rvsdb: {verdict} at pc = {pc:#018x}")?;
                self.stats.print(out)?;
            }
            RunState::Quit => self.stats.print(out)?,
            RunState::Stopped => {}
        }
        Ok(())
    }

    /// Ends the session and prints statistics.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn quit(&mut self, out: &mut dyn Write) -> io::Result<()> {
        self.state.state = RunState::Quit;
        self.stats.print(out)
    }

    fn execute(&mut self, n: u64, print_step: bool, out: &mut dyn Write) -> Result<(), SimError> {
        for _ in 0..n {
            let mut s = Decode::new(self.cpu.pc);
            let retired = match self.cpu.exec_once(&mut self.bus, &mut s) {
                Ok(Retire::Next) => true,
                Ok(Retire::Halt(ret)) => {
                    self.state.end(s.pc, ret);
                    true
                }
                Err(ExecError::UnsupportedTrap { pc, a7, mtvec }) => {
                    self.state.abort(pc, ABORT_RET);
                    return Err(SimError::UnsupportedTrap { pc, a7, mtvec });
                }
                Err(e) => {
                    error!("{e}");
                    self.state.abort(s.pc, ABORT_RET);
                    false
                }
            };
            self.stats.instructions_retired += 1;

            if self.config.trace.itrace || print_step {
                s.logbuf = render(s.pc, s.inst);
                if print_step {
                    writeln!(out, "{}", s.logbuf)?;
                }
                if self.config.trace.itrace {
                    self.iringbuf.push(std::mem::take(&mut s.logbuf));
                }
            }

            let touched_device = self.bus.take_device_access();
            if retired {
                self.check_reference(s.pc, touched_device, out)?;
                self.trace_call(&s);
            }

            if self.config.trace.watchpoints {
                self.poll_watchpoints(out)?;
            }

            if self.state.state != RunState::Running {
                break;
            }
            self.bus.update();
            self.take_interrupt();
        }
        Ok(())
    }

    fn take_interrupt(&mut self) {
        let Some(cause) = self.cpu.csrs.query_intr() else {
            return;
        };
        debug!(cause = format_args!("{cause:#x}"), "taking interrupt");
        self.cpu.pc = self.cpu.csrs.raise_intr(cause, self.cpu.pc);
        if let Some(dt) = self.difftest.as_mut() {
            dt.raise_intr(cause);
        }
    }

    fn check_reference(&mut self, pc: u64, skip_ref: bool, out: &mut dyn Write) -> io::Result<()> {
        let Some(dt) = self.difftest.as_mut() else {
            return Ok(());
        };
        let diff = dt.step(&self.cpu, pc, skip_ref);
        if diff.is_empty() {
            return Ok(());
        }
        for m in &diff {
            writeln!(out, "{m}")?;
        }
        self.dump_regs(out)?;
        self.state.abort(pc, ABORT_RET);
        Ok(())
    }

    fn trace_call(&mut self, s: &Decode) {
        if !self.config.trace.ftrace {
            return;
        }
        if let Some(symbols) = self.symbols.as_ref() {
            let _ = self.ftrace.on_step(symbols, s.pc, s.inst, s.dnpc);
        }
    }

    fn poll_watchpoints(&mut self, out: &mut dyn Write) -> io::Result<()> {
        if self.watchpoints.is_empty() {
            return Ok(());
        }
        let view = MachineView {
            cpu: &self.cpu,
            ram: self.bus.ram(),
            symbols: self.symbols.as_ref(),
        };
        for r in self.watchpoints.poll(&view) {
            writeln!(out, "Watchpoint {}: {}", r.id, r.expr)?;
            writeln!(out, "Old value: {}", r.old)?;
            writeln!(out, "New value: {}", r.new)?;
        }
        Ok(())
    }
}
