//! Cellular automata update logic - material movement physics

use super::TickState;
use crate::world::SimRng;

/// How eagerly a liquid leaves the straight-down path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowProfile {
    /// Chance to try each diagonal (down-left, down-right)
    pub diagonal_chance: f32,
    /// Chance to try flowing sideways into empty space
    pub spread_chance: f32,
}

impl FlowProfile {
    pub const WATER: FlowProfile = FlowProfile {
        diagonal_chance: 1.0,
        spread_chance: 1.0,
    };

    /// Oil is viscous: every move except straight down is gated
    pub const OIL: FlowProfile = FlowProfile {
        diagonal_chance: 0.3,
        spread_chance: 0.3,
    };

    pub const ACID: FlowProfile = FlowProfile {
        diagonal_chance: 1.0,
        spread_chance: 0.7,
    };
}

/// Cellular automata updater - handles material movement physics
///
/// Every step returns the cell's new index when it moved.
pub struct CellularAutomataUpdater;

impl CellularAutomataUpdater {
    /// Update powder material: up to `substeps` falls, stopping once stuck
    pub fn update_powder<R: SimRng>(state: &mut TickState<'_, R>, index: usize, substeps: u32) {
        let mut index = index;
        for _ in 0..substeps {
            match Self::fall_step(state, index) {
                Some(to) => index = to,
                None => break,
            }
        }
    }

    /// Down, then down-left, then down-right by density
    pub fn fall_step<R: SimRng>(state: &mut TickState<'_, R>, index: usize) -> Option<usize> {
        state
            .try_displace(index, 0, 1)
            .or_else(|| state.try_displace(index, -1, 1))
            .or_else(|| state.try_displace(index, 1, 1))
    }

    /// One liquid sub-step: fall by density, else spread sideways
    pub fn liquid_step<R: SimRng>(
        state: &mut TickState<'_, R>,
        index: usize,
        profile: &FlowProfile,
    ) -> Option<usize> {
        if let Some(to) = state.try_displace(index, 0, 1) {
            return Some(to);
        }

        for dx in [-1, 1] {
            if state.chance(profile.diagonal_chance)
                && let Some(to) = state.try_displace(index, dx, 1)
            {
                return Some(to);
            }
        }

        if state.chance(profile.spread_chance) {
            return Self::spread_step(state, index);
        }

        None
    }

    /// Sideways into empty space, random side first
    pub fn spread_step<R: SimRng>(state: &mut TickState<'_, R>, index: usize) -> Option<usize> {
        let dx = state.random_direction();
        state
            .try_move_into_empty(index, dx, 0)
            .or_else(|| state.try_move_into_empty(index, -dx, 0))
    }

    /// Up, then up-left, then up-right into empty space
    pub fn rise_step<R: SimRng>(state: &mut TickState<'_, R>, index: usize) -> Option<usize> {
        state
            .try_move_into_empty(index, 0, -1)
            .or_else(|| state.try_move_into_empty(index, -1, -1))
            .or_else(|| state.try_move_into_empty(index, 1, -1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::test_support::{FixedRng, with_state};
    use crate::world::Grid;
    use grainfall_simulation::MaterialKind;

    #[test]
    fn test_powder_falls_gravity_substeps() {
        let mut grid = Grid::new(1, 5).unwrap();
        grid.set(0, 0, MaterialKind::Sand);

        with_state(&mut grid, &mut FixedRng(0.0), |state| {
            CellularAutomataUpdater::update_powder(state, 0, 3);
        });

        assert_eq!(grid.get(0, 3), Some(MaterialKind::Sand));
        assert_eq!(grid.get(0, 0), Some(MaterialKind::Empty));
    }

    #[test]
    fn test_powder_slides_diagonally() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(1, 0, MaterialKind::Sand);
        grid.set(1, 1, MaterialKind::Wall);
        let index = grid.index(1, 0).unwrap();

        let moved = with_state(&mut grid, &mut FixedRng(0.0), |state| {
            CellularAutomataUpdater::fall_step(state, index)
        });

        assert_eq!(moved, grid.index(0, 1));
        assert_eq!(grid.get(0, 1), Some(MaterialKind::Sand));
    }

    #[test]
    fn test_powder_stuck_on_floor() {
        let mut grid = Grid::new(1, 1).unwrap();
        grid.set(0, 0, MaterialKind::Sand);

        let moved = with_state(&mut grid, &mut FixedRng(0.0), |state| {
            CellularAutomataUpdater::fall_step(state, 0)
        });
        assert_eq!(moved, None);
    }

    #[test]
    fn test_water_spreads_sideways() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.set(1, 0, MaterialKind::Water);
        let index = grid.index(1, 0).unwrap();

        let moved = with_state(&mut grid, &mut FixedRng(0.0), |state| {
            CellularAutomataUpdater::liquid_step(state, index, &FlowProfile::WATER)
        });

        // FixedRng(0.0) flips to the left first
        assert_eq!(moved, Some(0));
        assert_eq!(grid.get(0, 0), Some(MaterialKind::Water));
    }

    #[test]
    fn test_oil_sideways_moves_need_roll() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(1, 0, MaterialKind::Oil);
        grid.set(1, 1, MaterialKind::Wall);
        let index = grid.index(1, 0).unwrap();

        // 0.5 fails every 30% gate
        let moved = with_state(&mut grid, &mut FixedRng(0.5), |state| {
            CellularAutomataUpdater::liquid_step(state, index, &FlowProfile::OIL)
        });
        assert_eq!(moved, None);
        assert_eq!(grid.get(1, 0), Some(MaterialKind::Oil));

        let moved = with_state(&mut grid, &mut FixedRng(0.1), |state| {
            CellularAutomataUpdater::liquid_step(state, index, &FlowProfile::OIL)
        });
        assert_eq!(moved, grid.index(0, 1));
    }

    #[test]
    fn test_oil_falls_without_roll() {
        let mut grid = Grid::new(1, 2).unwrap();
        grid.set(0, 0, MaterialKind::Oil);

        let moved = with_state(&mut grid, &mut FixedRng(0.99), |state| {
            CellularAutomataUpdater::liquid_step(state, 0, &FlowProfile::OIL)
        });
        assert_eq!(moved, Some(1));
    }

    #[test]
    fn test_rise_only_into_empty() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(1, 1, MaterialKind::Steam);
        grid.set(1, 0, MaterialKind::Water);
        grid.set(0, 0, MaterialKind::Sand);
        let index = grid.index(1, 1).unwrap();

        let moved = with_state(&mut grid, &mut FixedRng(0.0), |state| {
            CellularAutomataUpdater::rise_step(state, index)
        });

        assert_eq!(moved, grid.index(2, 0));
        assert_eq!(grid.get(1, 0), Some(MaterialKind::Water));
    }
}
