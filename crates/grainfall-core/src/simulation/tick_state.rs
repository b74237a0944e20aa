//! Mutable state shared by every rule while a tick runs

use grainfall_simulation::{CellMetadata, MaterialKind};

use crate::world::{Grid, NeighborQueries, Neighbors, SimRng, SimStats};

/// Moved by a swap during the current pass
const MOVED: u8 = 1;
/// Created or converted this tick
const CHANGED: u8 = 2;

/// Grid access for material rules during one tick
///
/// Owns the "updated this tick" marks, which the sweeps use to skip cells.
/// Cells a rule creates or converts stay marked for the rest of the tick.
/// Both cells of a movement swap are only marked until the end of the
/// current pass, so a cell shoved aside by a falling one still gets its own
/// update in the next pass.
pub struct TickState<'a, R: SimRng> {
    grid: &'a mut Grid,
    updated: &'a mut [u8],
    stats: &'a mut dyn SimStats,
    rng: &'a mut R,
}

impl<'a, R: SimRng> TickState<'a, R> {
    pub fn new(
        grid: &'a mut Grid,
        updated: &'a mut [u8],
        stats: &'a mut dyn SimStats,
        rng: &'a mut R,
    ) -> Self {
        debug_assert_eq!(grid.len(), updated.len());
        Self {
            grid,
            updated,
            stats,
            rng,
        }
    }

    pub fn grid(&self) -> &Grid {
        &*self.grid
    }

    pub fn rng(&mut self) -> &mut R {
        &mut *self.rng
    }

    #[inline]
    pub fn kind(&self, index: usize) -> MaterialKind {
        self.grid.kind_at(index)
    }

    #[inline]
    pub fn meta(&self, index: usize) -> CellMetadata {
        self.grid.metadata_at(index)
    }

    #[inline]
    pub fn meta_mut(&mut self, index: usize) -> &mut CellMetadata {
        self.grid.metadata_at_mut(index)
    }

    #[inline]
    pub fn offset(&self, index: usize, dx: i32, dy: i32) -> Option<usize> {
        self.grid.offset(index, dx, dy)
    }

    pub fn neighbors(&self, index: usize) -> Neighbors {
        NeighborQueries::moore(self.grid(), index)
    }

    pub fn has_neighbor(&self, index: usize, kind: MaterialKind) -> bool {
        NeighborQueries::has_neighbor(self.grid(), index, kind)
    }

    pub fn neighbors_of_kind(&self, index: usize, kind: MaterialKind) -> Neighbors {
        NeighborQueries::neighbors_of_kind(self.grid(), index, kind)
    }

    #[inline]
    pub fn is_updated(&self, index: usize) -> bool {
        self.updated[index] != 0
    }

    #[inline]
    fn mark(&mut self, index: usize, flag: u8) {
        self.updated[index] |= flag;
    }

    /// Forget which cells moved; call between sweeps
    pub fn end_pass(&mut self) {
        for mark in self.updated.iter_mut() {
            *mark &= !MOVED;
        }
    }

    /// Roll a probability; certain and impossible outcomes skip the RNG
    #[inline]
    pub fn chance(&mut self, probability: f32) -> bool {
        if probability >= 1.0 {
            true
        } else if probability <= 0.0 {
            false
        } else {
            self.rng.check_probability(probability)
        }
    }

    /// Random horizontal direction, -1 or 1
    #[inline]
    pub fn random_direction(&mut self) -> i32 {
        if self.rng.gen_bool() { -1 } else { 1 }
    }

    /// Move the cell at `from` by `(dx, dy)` if the density rule allows it
    ///
    /// Returns the new index on success.
    pub fn try_displace(&mut self, from: usize, dx: i32, dy: i32) -> Option<usize> {
        let to = self.offset(from, dx, dy)?;
        if !self.kind(from).can_displace(self.kind(to)) {
            return None;
        }
        self.swap(from, to);
        Some(to)
    }

    /// Move the cell at `from` by `(dx, dy)` only into empty space
    pub fn try_move_into_empty(&mut self, from: usize, dx: i32, dy: i32) -> Option<usize> {
        let to = self.offset(from, dx, dy)?;
        if !self.kind(to).is_empty() {
            return None;
        }
        self.swap(from, to);
        Some(to)
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.grid.swap(a, b);
        self.mark(a, MOVED);
        self.mark(b, MOVED);
        self.stats.record_cell_moved();
    }

    /// Phase change of a cell into `kind` with fresh metadata
    pub fn convert(&mut self, index: usize, kind: MaterialKind) {
        self.grid.set_at(index, kind);
        self.mark(index, CHANGED);
        self.stats.record_state_change();
    }

    /// Reaction turning a cell into `kind` with fresh metadata
    pub fn react(&mut self, index: usize, kind: MaterialKind) {
        self.grid.set_at(index, kind);
        self.mark(index, CHANGED);
        self.stats.record_reaction();
    }

    /// Remove whatever is in the cell, leaving ambient empty space
    pub fn erase(&mut self, index: usize) {
        self.grid.reset_at(index);
        self.mark(index, CHANGED);
    }

    /// Count down the cell's lifespan; at zero the cell becomes empty
    ///
    /// Returns true if the cell expired.
    pub fn age(&mut self, index: usize) -> bool {
        let meta = self.grid.metadata_at_mut(index);
        meta.lifespan -= 1;
        if meta.lifespan > 0 {
            return false;
        }
        self.erase(index);
        self.stats.record_state_change();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::NoopStats;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn with_state<F>(grid: &mut Grid, f: F)
    where
        F: FnOnce(&mut TickState<'_, Xoshiro256StarStar>),
    {
        let mut updated = vec![0; grid.len()];
        let mut stats = NoopStats;
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let mut state = TickState::new(grid, &mut updated, &mut stats, &mut rng);
        f(&mut state);
    }

    #[test]
    fn test_try_displace_marks_both_cells() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(1, 0, MaterialKind::Sand);
        let from = grid.index(1, 0).unwrap();
        let to = grid.index(1, 1).unwrap();

        with_state(&mut grid, |state| {
            assert_eq!(state.try_displace(from, 0, 1), Some(to));
            assert!(state.is_updated(from));
            assert!(state.is_updated(to));
            assert_eq!(state.kind(to), MaterialKind::Sand);
        });
    }

    #[test]
    fn test_end_pass_clears_moves_but_not_conversions() {
        let mut grid = Grid::new(1, 3).unwrap();
        grid.set(0, 0, MaterialKind::Sand);
        grid.set(0, 1, MaterialKind::Fire);
        grid.set(0, 2, MaterialKind::Water);

        with_state(&mut grid, |state| {
            assert_eq!(state.try_displace(0, 0, 1), Some(1));
            state.convert(2, MaterialKind::Steam);
            assert!(state.is_updated(0));
            assert!(state.is_updated(1));

            state.end_pass();
            // The fire pushed up by the sand still gets its own update
            assert_eq!(state.kind(0), MaterialKind::Fire);
            assert!(!state.is_updated(0));
            assert!(!state.is_updated(1));
            assert!(state.is_updated(2));
        });
    }

    #[test]
    fn test_try_displace_respects_density_and_bounds() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(1, 1, MaterialKind::Water);
        grid.set(1, 2, MaterialKind::Sand);
        let water = grid.index(1, 1).unwrap();
        let sand = grid.index(1, 2).unwrap();

        with_state(&mut grid, |state| {
            assert_eq!(state.try_displace(water, 0, 1), None);
            assert_eq!(state.try_displace(sand, 0, 1), None);
            assert!(!state.is_updated(water));
        });
    }

    #[test]
    fn test_try_move_into_empty_refuses_lighter_material() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.set(0, 0, MaterialKind::Water);
        grid.set(1, 0, MaterialKind::Oil);
        let water = grid.index(0, 0).unwrap();

        with_state(&mut grid, |state| {
            assert_eq!(state.try_move_into_empty(water, 1, 0), None);
        });
    }

    #[test]
    fn test_age_expires_at_zero() {
        let mut grid = Grid::new(1, 1).unwrap();
        grid.set(0, 0, MaterialKind::Fire);
        grid.metadata_at_mut(0).lifespan = 2;

        with_state(&mut grid, |state| {
            assert!(!state.age(0));
            assert_eq!(state.meta(0).lifespan, 1);
            assert!(state.age(0));
            assert_eq!(state.kind(0), MaterialKind::Empty);
            assert_eq!(state.meta(0), CellMetadata::AMBIENT);
        });
    }

    #[test]
    fn test_chance_extremes_do_not_need_rng() {
        let mut grid = Grid::new(1, 1).unwrap();
        with_state(&mut grid, |state| {
            assert!(state.chance(1.0));
            assert!(!state.chance(0.0));
            assert!(!state.chance(-1.0));
        });
    }
}
