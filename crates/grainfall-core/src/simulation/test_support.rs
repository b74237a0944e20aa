//! Helpers shared by the rule unit tests

use super::TickState;
use crate::world::{Grid, NoopStats, SimRng};

/// Run `f` against a fresh tick state over `grid`
pub(crate) fn with_state<R, T, F>(grid: &mut Grid, rng: &mut R, f: F) -> T
where
    R: SimRng,
    F: FnOnce(&mut TickState<'_, R>) -> T,
{
    let mut updated = vec![0; grid.len()];
    let mut stats = NoopStats;
    let mut state = TickState::new(grid, &mut updated, &mut stats, rng);
    f(&mut state)
}

/// Fake RNG returning the same roll every time
///
/// `FixedRng(0.0)` makes every probability check succeed, `FixedRng(0.99)`
/// makes everything below 0.99 fail.
pub(crate) struct FixedRng(pub f32);

impl SimRng for FixedRng {
    fn gen_bool(&mut self) -> bool {
        self.0 < 0.5
    }

    fn gen_f32(&mut self) -> f32 {
        self.0
    }
}
