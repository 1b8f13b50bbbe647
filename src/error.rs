//! Error taxonomy for the profiler query and growth surfaces
//!
//! The per-fetch hot path has no recoverable error: a clock failure
//! degrades to a tick source, and a growth failure there is fatal because
//! continuing would index past an undersized counter table.

use thiserror::Error;

/// Errors surfaced by the query API and the registry growth operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("unit index {index} out of range ({len} units profiled)")]
    UnitOutOfRange { index: usize, len: usize },

    #[error("offset {offset} out of range for unit {unit} ({len} instructions)")]
    OffsetOutOfRange {
        unit: usize,
        offset: usize,
        len: usize,
    },

    #[error("counter allocation failed ({requested} slots requested)")]
    ResourceExhausted { requested: usize },
}

impl ProfileError {
    /// True for both index-class failures, unit and offset alike.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            ProfileError::UnitOutOfRange { .. } | ProfileError::OffsetOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
