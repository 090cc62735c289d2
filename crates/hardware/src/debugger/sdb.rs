//! Simple debugger command loop.
//!
//! Reads one line at a time, splits off the command word and dispatches through a
//! static table. Handlers print to the loop's writer; a handler returning
//! [`Flow::Exit`] ends the loop.

use std::io::{self, BufRead, Write};

use crate::common::error::SimError;
use crate::sim::Simulator;

/// Prompt printed before each command.
pub const PROMPT: &str = "(sdb) ";

/// What the loop does after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// Leave the loop.
    Exit,
}

type Handler = fn(&mut Sdb, Option<&str>, &mut dyn Write) -> Result<Flow, SimError>;

/// One entry of the command table.
#[derive(Clone, Copy, Debug)]
pub struct Command {
    /// Command word.
    pub name: &'static str,
    /// One-line help text.
    pub description: &'static str,
    handler: Handler,
}

/// Every command the loop understands.
pub static COMMANDS: [Command; 9] = [
    Command {
        name: "help",
        description: "Display information about all supported commands",
        handler: cmd_help,
    },
    Command {
        name: "c",
        description: "Continue the execution of the program",
        handler: cmd_c,
    },
    Command {
        name: "q",
        description: "Exit the debugger",
        handler: cmd_q,
    },
    Command {
        name: "si",
        description: "Execute the next [N] instructions (default 1)",
        handler: cmd_si,
    },
    Command {
        name: "info",
        description: "Display registers (r) or watchpoints (w)",
        handler: cmd_info,
    },
    Command {
        name: "x",
        description: "Display [N] 4-byte words of memory starting at address [EXPR]",
        handler: cmd_x,
    },
    Command {
        name: "p",
        description: "Evaluate [EXPR]",
        handler: cmd_p,
    },
    Command {
        name: "w",
        description: "Set a watchpoint that reports every change of [EXPR]",
        handler: cmd_w,
    },
    Command {
        name: "d",
        description: "Delete watchpoint [NO]",
        handler: cmd_d,
    },
];

/// Debugger front end owning the simulator.
#[derive(Debug)]
pub struct Sdb {
    /// The simulator being debugged.
    pub sim: Simulator,
    batch: bool,
}

impl Sdb {
    /// Wraps `sim`; in batch mode the loop runs the program once and returns.
    pub const fn new(sim: Simulator, batch: bool) -> Self {
        Self { sim, batch }
    }

    /// Runs the command loop until `q`, end of input, or (in batch mode) the first `c`.
    ///
    /// # Errors
    ///
    /// Fatal [`SimError`]s from the simulator, watchpoint exhaustion, or I/O failures.
    pub fn mainloop<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<(), SimError> {
        if self.batch {
            let _ = cmd_c(self, None, &mut out)?;
            return Ok(());
        }

        let mut line = String::new();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            if self.execute(&line, &mut out)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Executes one command line.
    ///
    /// # Errors
    ///
    /// As [`Self::mainloop`].
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow, SimError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let (name, args) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim()).filter(|a| !a.is_empty())),
            None => (line, None),
        };

        match COMMANDS.iter().find(|c| c.name == name) {
            Some(cmd) => (cmd.handler)(self, args, out),
            None => {
                writeln!(out, "Unknown command '{name}'")?;
                Ok(Flow::Continue)
            }
        }
    }
}

fn usage(out: &mut dyn Write, text: &str) -> Result<Flow, SimError> {
    writeln!(out, "Usage: {text}")?;
    Ok(Flow::Continue)
}

fn cmd_help(_: &mut Sdb, args: Option<&str>, out: &mut dyn Write) -> Result<Flow, SimError> {
    match args {
        None => {
            for c in &COMMANDS {
                writeln!(out, "{} - {}", c.name, c.description)?;
            }
        }
        Some(arg) => match COMMANDS.iter().find(|c| c.name == arg) {
            Some(c) => writeln!(out, "{} - {}", c.name, c.description)?,
            None => writeln!(out, "Unknown command '{arg}'")?,
        },
    }
    Ok(Flow::Continue)
}

fn cmd_c(sdb: &mut Sdb, _: Option<&str>, out: &mut dyn Write) -> Result<Flow, SimError> {
    sdb.sim.run(u64::MAX, out)?;
    Ok(Flow::Continue)
}

fn cmd_q(sdb: &mut Sdb, _: Option<&str>, out: &mut dyn Write) -> Result<Flow, SimError> {
    sdb.sim.quit(out)?;
    Ok(Flow::Exit)
}

fn cmd_si(sdb: &mut Sdb, args: Option<&str>, out: &mut dyn Write) -> Result<Flow, SimError> {
    let n = match args {
        None => 1,
        Some(arg) => match arg.parse::<u64>() {
            Ok(n) => n,
            Err(_) => return usage(out, "si [N]"),
        },
    };
    sdb.sim.run(n, out)?;
    Ok(Flow::Continue)
}

fn cmd_info(sdb: &mut Sdb, args: Option<&str>, out: &mut dyn Write) -> Result<Flow, SimError> {
    match args {
        Some("r") => sdb.sim.dump_regs(out)?,
        Some("w") => {
            if sdb.sim.watchpoints.is_empty() {
                writeln!(out, "No watchpoints!")?;
            } else {
                writeln!(out, "{:<8}{:<8}", "No", "EXPR")?;
                for wp in sdb.sim.watchpoints.iter() {
                    writeln!(out, "{:<8}{:<8}", wp.id(), wp.expr)?;
                }
            }
        }
        _ => return usage(out, "info r|w"),
    }
    Ok(Flow::Continue)
}

fn cmd_x(sdb: &mut Sdb, args: Option<&str>, out: &mut dyn Write) -> Result<Flow, SimError> {
    let Some((count, expr)) = args.and_then(|a| a.split_once(char::is_whitespace)) else {
        return usage(out, "x N EXPR");
    };
    let Ok(count) = count.parse::<u64>() else {
        return usage(out, "x N EXPR");
    };
    let mut addr = match sdb.sim.eval(expr) {
        Ok(addr) => addr,
        Err(e) => {
            writeln!(out, "EXPR error: {e}")?;
            return usage(out, "x N EXPR");
        }
    };
    for _ in 0..count {
        match sdb.sim.read_word(addr) {
            Ok(word) => writeln!(out, "{addr:#010x}: {word:#010x}")?,
            Err(e) => {
                writeln!(out, "{e}")?;
                break;
            }
        }
        addr = addr.wrapping_add(4);
    }
    Ok(Flow::Continue)
}

fn cmd_p(sdb: &mut Sdb, args: Option<&str>, out: &mut dyn Write) -> Result<Flow, SimError> {
    let Some(expr) = args else {
        return usage(out, "p EXPR");
    };
    match sdb.sim.eval(expr) {
        Ok(val) => writeln!(out, "{val} ({val:#x})")?,
        Err(e) => {
            writeln!(out, "EXPR error: {e}")?;
            return usage(out, "p EXPR");
        }
    }
    Ok(Flow::Continue)
}

fn cmd_w(sdb: &mut Sdb, args: Option<&str>, out: &mut dyn Write) -> Result<Flow, SimError> {
    let Some(expr) = args else {
        return usage(out, "w EXPR");
    };
    let value = match sdb.sim.eval(expr) {
        Ok(val) => val,
        Err(e) => {
            writeln!(out, "EXPR error: {e}")?;
            return usage(out, "w EXPR");
        }
    };
    let id = sdb.sim.watchpoints.create(expr, value)?;
    writeln!(out, "Watchpoint {id}: {expr}")?;
    Ok(Flow::Continue)
}

fn cmd_d(sdb: &mut Sdb, args: Option<&str>, out: &mut dyn Write) -> Result<Flow, SimError> {
    let Some(Ok(id)) = args.map(str::parse::<usize>) else {
        return usage(out, "d NO");
    };
    match sdb.sim.watchpoints.release(id) {
        Ok(expr) => writeln!(out, "Delete watchpoint {id}: {expr}")?,
        Err(e) => writeln!(out, "{e}")?,
    }
    Ok(Flow::Continue)
}

/// Runs the loop on the process's standard input and output.
///
/// # Errors
///
/// As [`Sdb::mainloop`].
pub fn run_stdio(sdb: &mut Sdb) -> Result<(), SimError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    sdb.mainloop(stdin.lock(), stdout.lock())
}
