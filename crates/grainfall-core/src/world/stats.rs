//! Simulation statistics collection trait

use serde::{Deserialize, Serialize};

/// Trait for collecting simulation statistics
///
/// The engine reports into this while it runs a tick, so callers decide
/// whether counting is worth the cost.
pub trait SimStats {
    /// Record that a cell moved (one swap)
    fn record_cell_moved(&mut self);

    /// Record a phase change (melting, freezing, boiling, condensing)
    fn record_state_change(&mut self);

    /// Record a reaction (ignition, dissolving, extinguishing, growth)
    fn record_reaction(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_cell_moved(&mut self) {}
    fn record_state_change(&mut self) {}
    fn record_reaction(&mut self) {}
}

/// Counting implementation, accumulated across ticks until reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    pub cells_moved: u64,
    pub state_changes: u64,
    pub reactions: u64,
}

impl TickStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl SimStats for TickStats {
    fn record_cell_moved(&mut self) {
        self.cells_moved += 1;
    }

    fn record_state_change(&mut self) {
        self.state_changes += 1;
    }

    fn record_reaction(&mut self) {
        self.reactions += 1;
    }
}
