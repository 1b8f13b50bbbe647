//! Fetch-hook handler, time attribution, and the query surface
//!
//! The interpreter reports each instruction fetch before executing it, so
//! there is no "instruction finished" event to time against. Elapsed time
//! for instruction N is therefore charged when the next counted fetch
//! arrives: the hook reads the clock, credits the interval to the
//! instruction the cursor points at, counts the current fetch, and moves
//! the cursor. The last instruction executed before shutdown is never
//! charged.
//!
//! Call-marker fetches are skipped without touching the cursor, which
//! makes the caller's last counted instruction absorb everything executed
//! inside the call until the next counted fetch. Nested and recursive
//! calls lose per-callee granularity; that inclusive attribution is the
//! intended reading.

use crate::clock::{default_clock, Clock, DefaultClock};
use crate::error::{ProfileError, Result};
use crate::interp::{CodeUnit, FetchHook, Interpreter, UnitId};
use crate::registry::Registry;

/// The instruction most recently known to be executing, and when its
/// interval started.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    unit: usize,
    offset: usize,
    time: f64,
}

/// Per-process profiling state: counter tables, clock, attribution cursor.
///
/// One instance per interpreter, owned by whoever wires up the dispatch
/// loop. All state is explicit so tests construct independent instances.
pub struct Profiler<C: Clock = DefaultClock> {
    registry: Registry,
    clock: C,
    cursor: Option<Cursor>,
}

/// Resolved query result for one (unit, offset) pair.
///
/// `source_file`/`source_line` are `None` when the unit carries no debug
/// info for that offset; that is an answer, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileEntry {
    pub source_file: Option<String>,
    pub source_line: Option<u32>,
    pub hits: u64,
    /// Accumulated seconds attributed to the instruction.
    pub time: f64,
}

impl Profiler<DefaultClock> {
    /// Profiler backed by the build-time selected clock source.
    pub fn new() -> Self {
        Self::with_clock(default_clock())
    }
}

impl Default for Profiler<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Profiler<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            registry: Registry::new(),
            clock,
            cursor: None,
        }
    }

    /// Initialization entry point, called once before the host runs code.
    ///
    /// Sizes the registry to the units already compiled (possibly zero).
    /// Units compiled later are picked up lazily by the hook.
    pub fn attach<I: Interpreter>(&mut self, interp: &I) -> Result<()> {
        self.registry.ensure_capacity(interp)
    }

    /// Shutdown entry point: renders the end-of-run report to stderr.
    ///
    /// Hosts wanting custom analysis skip this and walk the query API
    /// themselves; the collected data is fully queryable either way.
    pub fn finalize<I: Interpreter>(&self, interp: &I) {
        crate::report::print_report(self, interp);
    }

    /// Hot-path hook, invoked by the dispatch loop once per fetched
    /// instruction.
    ///
    /// Counter tables are re-resolved from the registry on every call:
    /// growth reallocates the backing array, so nothing may be cached
    /// across invocations. The only allocation happens on the rare growth
    /// branch; a growth failure panics rather than leaving counters
    /// indexable past their table.
    pub fn on_instruction_fetch<I: Interpreter>(
        &mut self,
        interp: &I,
        unit: UnitId,
        offset: usize,
    ) {
        if unit.is_call_marker() {
            return;
        }

        let index = unit.index();
        if index >= self.registry.len() {
            if let Err(err) = self.registry.ensure_capacity(interp) {
                panic!("counter table growth failed: {err}");
            }
        }

        let now = self.clock.now();
        if let Some(cursor) = self.cursor {
            self.registry
                .add_time(cursor.unit, cursor.offset, now - cursor.time);
        }
        self.registry.add_hit(index, offset);
        self.cursor = Some(Cursor {
            unit: index,
            offset,
            time: now,
        });
    }

    /// Number of units the profiler has seen.
    pub fn unit_count(&self) -> usize {
        self.registry.len()
    }

    /// The collected counter tables, for the output modules.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Instruction count of a profiled unit.
    pub fn instruction_count(&self, unit: usize) -> Result<usize> {
        self.registry
            .table(unit)
            .map(|table| table.len())
            .ok_or(ProfileError::UnitOutOfRange {
                index: unit,
                len: self.registry.len(),
            })
    }

    /// Counter and source location for one (unit, offset) pair.
    pub fn lookup<I: Interpreter>(
        &self,
        interp: &I,
        unit: usize,
        offset: usize,
    ) -> Result<ProfileEntry> {
        let table = self
            .registry
            .table(unit)
            .ok_or(ProfileError::UnitOutOfRange {
                index: unit,
                len: self.registry.len(),
            })?;
        let counter = table
            .counter(offset)
            .ok_or(ProfileError::OffsetOutOfRange {
                unit,
                offset,
                len: table.len(),
            })?;

        let code_unit = interp.unit(unit);
        Ok(ProfileEntry {
            source_file: code_unit.source_file().map(str::to_owned),
            source_line: code_unit.source_line(offset),
            hits: counter.hits,
            time: counter.time,
        })
    }
}

impl<C: Clock, I: Interpreter> FetchHook<I> for Profiler<C> {
    fn on_instruction_fetch(&mut self, interp: &I, unit: UnitId, offset: usize) {
        Profiler::on_instruction_fetch(self, interp, unit, offset);
    }
}
