// Shared fixtures for integration tests: a mock interpreter and a
// scripted replay driver.
#![allow(dead_code)] // each test binary uses its own subset

use contador::clock::ManualClock;
use contador::interp::{CodeUnit, Interpreter, UnitId};
use contador::profiler::Profiler;

/// Route library tracing through the test harness when RUST_LOG is set.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct MockUnit {
    file: Option<String>,
    lines: Vec<Option<u32>>,
}

impl MockUnit {
    /// Unit with full debug info: one source line per instruction.
    pub fn with_debug(file: &str, lines: &[u32]) -> Self {
        Self {
            file: Some(file.to_string()),
            lines: lines.iter().map(|&l| Some(l)).collect(),
        }
    }

    /// Unit compiled without debug info.
    pub fn stripped(instruction_count: usize) -> Self {
        Self {
            file: None,
            lines: vec![None; instruction_count],
        }
    }
}

impl CodeUnit for MockUnit {
    fn instruction_count(&self) -> usize {
        self.lines.len()
    }

    fn source_file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    fn source_line(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied().flatten()
    }
}

#[derive(Default)]
pub struct MockInterp {
    units: Vec<MockUnit>,
}

impl MockInterp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, unit: MockUnit) -> UnitId {
        self.units.push(unit);
        UnitId::new((self.units.len() - 1) as u32)
    }
}

impl Interpreter for MockInterp {
    type Unit = MockUnit;

    fn unit_count(&self) -> usize {
        self.units.len()
    }

    fn unit(&self, index: usize) -> &MockUnit {
        &self.units[index]
    }
}

/// A profiler driven by a scripted clock.
pub fn manual_profiler() -> (Profiler<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (Profiler::with_clock(clock.clone()), clock)
}

/// One scripted fetch event: clock reading, unit, offset.
pub type FetchEvent = (f64, UnitId, usize);

/// Replay fetch events against the profiler in order.
pub fn replay(
    profiler: &mut Profiler<ManualClock>,
    clock: &ManualClock,
    interp: &MockInterp,
    events: &[FetchEvent],
) {
    for &(t, unit, offset) in events {
        clock.set(t);
        profiler.on_instruction_fetch(interp, unit, offset);
    }
}
