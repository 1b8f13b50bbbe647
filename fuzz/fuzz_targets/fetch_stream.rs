#![no_main]

use libfuzzer_sys::fuzz_target;

use contador::clock::TickClock;
use contador::interp::{CodeUnit, Interpreter, UnitId};
use contador::profiler::Profiler;

struct FuzzUnit {
    len: usize,
}

impl CodeUnit for FuzzUnit {
    fn instruction_count(&self) -> usize {
        self.len
    }

    fn source_file(&self) -> Option<&str> {
        None
    }

    fn source_line(&self, _offset: usize) -> Option<u32> {
        None
    }
}

struct FuzzInterp {
    units: Vec<FuzzUnit>,
}

impl Interpreter for FuzzInterp {
    type Unit = FuzzUnit;

    fn unit_count(&self) -> usize {
        self.units.len()
    }

    fn unit(&self, index: usize) -> &FuzzUnit {
        &self.units[index]
    }
}

// Decode arbitrary bytes into an in-contract fetch stream (valid unit
// indices and offsets, call markers mixed in) and check that the hook,
// queries, and dump never panic.
fuzz_target!(|data: &[u8]| {
    let Some((&n_units, rest)) = data.split_first() else {
        return;
    };
    let n_units = (n_units as usize % 8) + 1;
    if rest.len() < n_units {
        return;
    }

    let (sizes, events) = rest.split_at(n_units);
    let interp = FuzzInterp {
        units: sizes
            .iter()
            .map(|&b| FuzzUnit {
                len: (b as usize % 32) + 1,
            })
            .collect(),
    };

    let mut profiler = Profiler::with_clock(TickClock::new());
    for pair in events.chunks_exact(2) {
        let sel = pair[0] as usize % (n_units + 1);
        if sel == n_units {
            profiler.on_instruction_fetch(&interp, UnitId::CALL_MARKER, 0);
        } else {
            let offset = pair[1] as usize % interp.units[sel].len;
            profiler.on_instruction_fetch(&interp, UnitId::new(sel as u32), offset);
        }
    }

    for unit in 0..profiler.unit_count() {
        let len = profiler.instruction_count(unit).unwrap();
        for offset in 0..len {
            let _ = profiler.lookup(&interp, unit, offset).unwrap();
        }
    }
    let _ = contador::json_output::build(&profiler, &interp);
});
