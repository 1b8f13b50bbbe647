//! JSON output format for collected profiles

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::interp::{CodeUnit, Interpreter};
use crate::profiler::Profiler;

/// Counter for a single instruction offset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonEntry {
    /// Instruction offset within the unit
    pub offset: usize,
    /// Source line (if debug info covers this offset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Fetch count
    pub hits: u64,
    /// Accumulated seconds
    pub time_secs: f64,
}

/// One code unit's counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonUnit {
    /// Unit index assigned by the interpreter
    pub unit: usize,
    pub instruction_count: usize,
    /// Source file (if debug info is attached)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    pub entries: Vec<JsonEntry>,
}

/// Complete profile dump
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonProfile {
    pub unit_count: usize,
    pub units: Vec<JsonUnit>,
}

/// Mirror the query surface into serializable form.
pub fn build<C: Clock, I: Interpreter>(profiler: &Profiler<C>, interp: &I) -> JsonProfile {
    let mut units = Vec::with_capacity(profiler.unit_count());

    for (unit_index, table) in profiler.registry().iter().enumerate() {
        let unit = interp.unit(unit_index);
        let entries = table
            .counters()
            .iter()
            .enumerate()
            .map(|(offset, counter)| JsonEntry {
                offset,
                line: unit.source_line(offset),
                hits: counter.hits,
                time_secs: counter.time,
            })
            .collect();

        units.push(JsonUnit {
            unit: unit_index,
            instruction_count: table.len(),
            source_file: unit.source_file().map(str::to_owned),
            entries,
        });
    }

    JsonProfile {
        unit_count: units.len(),
        units,
    }
}

/// Render the profile as pretty-printed JSON.
pub fn render<C: Clock, I: Interpreter>(
    profiler: &Profiler<C>,
    interp: &I,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&build(profiler, interp))
}
