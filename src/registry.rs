//! Counter storage: one table per code unit, one counter per instruction
//!
//! The registry is the profiler's only allocation site. It grows lazily
//! the first time a unit index beyond its length is fetched, which covers
//! code compiled after profiling started. Growth reallocates the backing
//! array, so references into it must never be cached across fetches.

use crate::error::{ProfileError, Result};
use crate::interp::{CodeUnit, Interpreter};

/// Hit count and accumulated seconds for one instruction offset.
///
/// Zero-initialized, monotonically non-decreasing, mutated only by the
/// fetch hook.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Counter {
    pub hits: u64,
    /// Accumulated elapsed seconds attributed to this instruction.
    pub time: f64,
}

/// Per-unit counter array, sized to the unit's instruction count at
/// creation and never resized.
#[derive(Debug, Default)]
pub struct CounterTable {
    counters: Vec<Counter>,
}

impl CounterTable {
    fn for_unit(unit: &impl CodeUnit) -> Result<Self> {
        let len = unit.instruction_count();
        let mut counters = Vec::new();
        counters
            .try_reserve_exact(len)
            .map_err(|_| ProfileError::ResourceExhausted { requested: len })?;
        counters.resize(len, Counter::default());
        Ok(Self { counters })
    }

    /// Instruction count of the unit this table belongs to.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn counter(&self, offset: usize) -> Option<&Counter> {
        self.counters.get(offset)
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }
}

/// Ordered collection of counter tables, indexed by unit index.
///
/// Length only ever grows, and stays at or below the interpreter's unit
/// count. Existing tables are never reordered or reallocated per-entry;
/// only the outer sequence moves on growth.
#[derive(Debug, Default)]
pub struct Registry {
    tables: Vec<CounterTable>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of units seen so far.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table(&self, unit: usize) -> Option<&CounterTable> {
        self.tables.get(unit)
    }

    /// Tables in unit order.
    pub fn iter(&self) -> std::slice::Iter<'_, CounterTable> {
        self.tables.iter()
    }

    /// Grow to cover every unit the interpreter currently has.
    ///
    /// No-op when already covered. Otherwise appends one zero-initialized
    /// table per new unit, sized to that unit's instruction count. Rare
    /// relative to fetches: once per newly compiled unit, never per
    /// instruction.
    pub fn ensure_capacity<I: Interpreter>(&mut self, interp: &I) -> Result<()> {
        let total = interp.unit_count();
        let seen = self.tables.len();
        if total <= seen {
            return Ok(());
        }

        self.tables
            .try_reserve_exact(total - seen)
            .map_err(|_| ProfileError::ResourceExhausted {
                requested: total - seen,
            })?;
        for index in seen..total {
            self.tables.push(CounterTable::for_unit(interp.unit(index))?);
        }

        tracing::debug!(from = seen, to = total, "grew counter tables");
        Ok(())
    }

    /// Charge elapsed seconds to an instruction already covered by growth.
    #[inline]
    pub(crate) fn add_time(&mut self, unit: usize, offset: usize, elapsed: f64) {
        self.tables[unit].counters[offset].time += elapsed;
    }

    /// Count one fetch of an instruction already covered by growth.
    #[inline]
    pub(crate) fn add_hit(&mut self, unit: usize, offset: usize) {
        self.tables[unit].counters[offset].hits += 1;
    }
}
