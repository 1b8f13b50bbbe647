//! Contador - zero-sampling instruction-level profiler for bytecode interpreters
//!
//! Observes every instruction a dispatch loop fetches and attributes
//! elapsed time and hit counts to the exact bytecode offset executed,
//! with source-line resolution through the interpreter's own debug info.
//! The host implements the [`interp`] boundary traits, reports fetches
//! through the hook, and queries or reports the collected data at
//! shutdown.
//!
//! # Embedding
//!
//! ```
//! use contador::clock::ManualClock;
//! use contador::interp::{CodeUnit, Interpreter, UnitId};
//! use contador::profiler::Profiler;
//!
//! // The host VM implements the boundary traits over its own types.
//! struct Unit {
//!     lines: Vec<u32>,
//! }
//!
//! impl CodeUnit for Unit {
//!     fn instruction_count(&self) -> usize {
//!         self.lines.len()
//!     }
//!     fn source_file(&self) -> Option<&str> {
//!         Some("demo.rb")
//!     }
//!     fn source_line(&self, offset: usize) -> Option<u32> {
//!         self.lines.get(offset).copied()
//!     }
//! }
//!
//! struct Vm {
//!     units: Vec<Unit>,
//! }
//!
//! impl Interpreter for Vm {
//!     type Unit = Unit;
//!     fn unit_count(&self) -> usize {
//!         self.units.len()
//!     }
//!     fn unit(&self, index: usize) -> &Unit {
//!         &self.units[index]
//!     }
//! }
//!
//! let vm = Vm {
//!     units: vec![Unit { lines: vec![1, 2] }],
//! };
//! let clock = ManualClock::new();
//! let mut profiler = Profiler::with_clock(clock.clone());
//! profiler.attach(&vm).unwrap();
//!
//! // The dispatch loop reports each fetch before executing it.
//! clock.set(0.000);
//! profiler.on_instruction_fetch(&vm, UnitId::new(0), 0);
//! clock.set(0.002);
//! profiler.on_instruction_fetch(&vm, UnitId::new(0), 1);
//!
//! let entry = profiler.lookup(&vm, 0, 0).unwrap();
//! assert_eq!(entry.hits, 1);
//! assert!((entry.time - 0.002).abs() < 1e-9);
//! ```

pub mod clock;
pub mod error;
pub mod interp;
pub mod json_output;
pub mod profiler;
pub mod registry;
pub mod report;
pub mod source;

#[cfg(test)]
pub(crate) mod testutil;
