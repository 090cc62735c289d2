//! RV64 simulator and debugger CLI.
//!
//! This binary wires the library together. It performs:
//! 1. **Arguments:** Parses the command line and an optional JSON configuration file.
//! 2. **Logging:** Installs a `tracing` subscriber writing to stderr or a log file.
//! 3. **Start-up:** Loads the guest image, the symbol file and the reference model.
//! 4. **Debugging:** Runs the command loop (or the whole program in batch mode) and
//!    maps the outcome to the process exit status.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rvsdb_core::common::SimError;
use rvsdb_core::debugger::sdb;
use rvsdb_core::sim::difftest::DylibRef;
use rvsdb_core::{Config, Sdb, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "rvsdb",
    author,
    version,
    about = "RV64 instruction-set simulator with a symbolic debugger",
    long_about = "Run an RV64IM guest image under an interactive debugger.\n\nWithout IMAGE a built-in program is run. An IMAGE starting with the ELF magic is loaded by segment; anything else is copied to the start of guest RAM.\n\nExamples:\n  rvsdb -b build/dummy.bin\n  rvsdb -e build/kernel.elf -d ref.so build/kernel.bin"
)]
struct Cli {
    /// Run the program to completion without entering the command loop.
    #[arg(short, long)]
    batch: bool,

    /// Write log output to FILE instead of stderr.
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Shared library of the reference model for differential testing.
    #[arg(short, long, value_name = "REF_SO")]
    diff: Option<PathBuf>,

    /// Port handed to the reference model.
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// ELF file to read function symbols from.
    #[arg(short, long, value_name = "FILE")]
    elf: Option<PathBuf>,

    /// JSON configuration file; command-line flags take precedence.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Guest image (raw binary or ELF executable).
    image: Option<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(0);
        }
    };

    if let Err(e) = init_logging(cli.log.as_deref()) {
        eprintln!("cannot open log file: {e}");
        process::exit(1);
    }

    match run(cli) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{e}");
            eprintln!("rvsdb: {e}");
            process::exit(1);
        }
    }
}

/// Installs the global subscriber; `RUST_LOG` overrides the default `info` filter.
fn init_logging(log: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Builds the simulator, runs the debugger and reports whether the exit was good.
fn run(cli: Cli) -> Result<bool, SimError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    config.general.batch |= cli.batch;
    if let Some(path) = cli.diff {
        config.difftest.ref_so = Some(path);
    }
    if let Some(port) = cli.port {
        config.difftest.port = port;
    }

    let mut sim = Simulator::new(config.clone())?;
    match &cli.image {
        Some(path) => sim.load_image(path)?,
        None => info!("No image is given. Use the built-in image."),
    }
    match &cli.elf {
        Some(path) => sim.load_symbols(path)?,
        None => info!("No ELF file is given. Function tracing is off."),
    }
    match &config.difftest.ref_so {
        Some(path) => {
            let model = DylibRef::open(path, config.difftest.port)?;
            sim.attach_difftest(Box::new(model))?;
        }
        None => info!("Differential testing: OFF"),
    }

    if !config.general.batch {
        println!("Welcome to rvsdb (riscv64)!");
        println!("For help, type \"help\"");
    }

    let mut sdb = Sdb::new(sim, config.general.batch);
    sdb::run_stdio(&mut sdb)?;
    Ok(sdb.sim.state.is_good_exit())
}
