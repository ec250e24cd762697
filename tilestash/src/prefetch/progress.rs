//! Progress and completion reporting for a prefetch run.

use std::fmt;

use crate::coord::TileCoord;

/// Emitted after every tile attempt, successful or not.
///
/// Events arrive strictly in order with `completed` going `1..=total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchProgress {
    /// Tiles attempted so far.
    pub completed: u64,
    /// Tiles in the run.
    pub total: u64,
    /// Tiles stored so far.
    pub stored: u64,
    /// The tile just attempted.
    pub tile: TileCoord,
}

impl PrefetchProgress {
    /// Fraction of the run attempted, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Outcome of a finished prefetch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefetchSummary {
    /// Tiles in the run.
    pub total: u64,
    /// Tiles fetched and written to the store.
    pub stored: u64,
    /// Tiles whose fetch or store failed.
    pub failed: u64,
}

impl fmt::Display for PrefetchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stored {} of {} tiles ({} failed)",
            self.stored, self.total, self.failed
        )
    }
}
