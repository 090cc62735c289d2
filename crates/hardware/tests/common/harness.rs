use rvsdb_core::common::error::ExprError;
use rvsdb_core::config::Config;
use rvsdb_core::sim::RunState;
use rvsdb_core::{Sdb, Simulator};

/// RAM size used by test simulators.
pub const TEST_RAM_SIZE: u64 = 1024 * 1024;

/// Test configuration: 1 MiB of RAM at the default base, tracing on.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.memory.size = TEST_RAM_SIZE;
    config
}

/// Routes `tracing` output through the test harness' capture.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("warn")
        .try_init();
}

/// Encodes instruction words as little-endian bytes.
pub fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

pub struct TestContext {
    pub sim: Simulator,
    pub out: Vec<u8>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        init_tracing();
        let sim = Simulator::new(config).expect("test RAM holds the built-in image");
        Self { sim, out: Vec::new() }
    }

    /// Loads `program` as a raw image at the RAM base; the hart restarts there.
    pub fn load_program(mut self, program: &[u32]) -> Self {
        self.sim
            .load_image_bytes(&words_to_bytes(program))
            .expect("program fits in test RAM");
        self
    }

    /// Runs at most `n` instructions, capturing the output.
    pub fn run(&mut self, n: u64) -> &mut Self {
        self.sim.run(n, &mut self.out).expect("run succeeds");
        self
    }

    /// Runs to completion.
    pub fn run_to_end(&mut self) -> &mut Self {
        self.run(u64::MAX)
    }

    /// Captured output so far, as text.
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }

    pub fn get_reg(&self, idx: usize) -> u64 {
        self.sim.cpu.gpr.read(idx)
    }

    pub fn set_reg(&mut self, idx: usize, val: u64) -> &mut Self {
        self.sim.cpu.gpr.write(idx, val);
        self
    }

    pub fn eval(&self, expr: &str) -> Result<u64, ExprError> {
        self.sim.eval(expr)
    }

    pub fn state(&self) -> RunState {
        self.sim.state.state
    }

    /// Hands the simulator to a non-batch debugger.
    pub fn into_sdb(self) -> Sdb {
        Sdb::new(self.sim, false)
    }
}
