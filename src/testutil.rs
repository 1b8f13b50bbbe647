//! Mock interpreter used by module tests.

use crate::interp::{CodeUnit, Interpreter, UnitId};

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

    /// Append a unit, returning the id the interpreter would hand the hook.
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
