//! Tick scheduling: which rule runs on which cell, in which order

use grainfall_simulation::MaterialKind;

use super::ca_update::{CellularAutomataUpdater, FlowProfile};
use super::chemistry_system::{
    ChemistrySystem, OIL_IGNITION_CHANCE, OIL_IGNITION_TEMPERATURE, PLANT_IGNITION_CHANCE,
    PLANT_IGNITION_TEMPERATURE,
};
use super::state_changes::StateChangeSystem;
use super::temperature::TemperatureSimulator;
use super::{SimConfig, TickState};
use crate::world::{Grid, SimRng, SimStats};

/// Steam loses this much heat every tick it survives
pub const STEAM_COOLING: f32 = 0.2;

/// Runs simulation ticks over a grid
///
/// A tick is four passes, always in this order:
/// 0. clear the per-cell "updated" marks
/// 1. dense pass, rows bottom-to-top: sand, water, oil, acid, ice
/// 2. buoyant pass, rows top-to-bottom: fire, steam, plant
/// 3. temperature diffusion in index order
///
/// Within a row the column order alternates (even rows left-to-right, odd
/// rows right-to-left) to avoid a directional bias.
#[derive(Debug, Default)]
pub struct UpdateEngine {
    updated: Vec<u8>,
}

impl UpdateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance `grid` by one tick
    pub fn tick<R: SimRng>(
        &mut self,
        grid: &mut Grid,
        config: &SimConfig,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        self.updated.clear();
        self.updated.resize(grid.len(), 0);

        let width = grid.width();
        let height = grid.height();
        {
            let mut state = TickState::new(grid, &mut self.updated, stats, rng);

            for y in (0..height).rev() {
                for i in 0..width {
                    let index = row_index(width, y, i);
                    if !state.is_updated(index) {
                        Self::update_dense(&mut state, index, config);
                    }
                }
            }
            state.end_pass();

            for y in 0..height {
                for i in 0..width {
                    let index = row_index(width, y, i);
                    if !state.is_updated(index) {
                        Self::update_buoyant(&mut state, index);
                    }
                }
            }
        }

        TemperatureSimulator::diffuse(grid);
    }

    fn update_dense<R: SimRng>(state: &mut TickState<'_, R>, index: usize, config: &SimConfig) {
        match state.kind(index) {
            MaterialKind::Sand => {
                CellularAutomataUpdater::update_powder(state, index, config.gravity_substeps())
            }
            MaterialKind::Water => Self::update_water(state, index, config),
            MaterialKind::Oil => Self::update_oil(state, index, config),
            MaterialKind::Acid => Self::update_acid(state, index, config),
            MaterialKind::Ice => Self::update_ice(state, index),
            MaterialKind::Empty
            | MaterialKind::Wall
            | MaterialKind::Fire
            | MaterialKind::Plant
            | MaterialKind::Steam => {}
        }
    }

    fn update_buoyant<R: SimRng>(state: &mut TickState<'_, R>, index: usize) {
        match state.kind(index) {
            MaterialKind::Fire => Self::update_fire(state, index),
            MaterialKind::Steam => Self::update_steam(state, index),
            MaterialKind::Plant => Self::update_plant(state, index),
            MaterialKind::Empty
            | MaterialKind::Sand
            | MaterialKind::Water
            | MaterialKind::Wall
            | MaterialKind::Oil
            | MaterialKind::Acid
            | MaterialKind::Ice => {}
        }
    }

    fn update_water<R: SimRng>(state: &mut TickState<'_, R>, index: usize, config: &SimConfig) {
        let mut index = index;
        for _ in 0..config.gravity_substeps() {
            let moved = CellularAutomataUpdater::liquid_step(state, index, &FlowProfile::WATER);
            if let Some(to) = moved {
                index = to;
            }

            if StateChangeSystem::water_phase_change(state, index) {
                return;
            }
            ChemistrySystem::extinguish_adjacent_fire(state, index);

            if moved.is_none() {
                break;
            }
        }
    }

    fn update_oil<R: SimRng>(state: &mut TickState<'_, R>, index: usize, config: &SimConfig) {
        let mut index = index;
        for _ in 0..config.oil_substeps() {
            let moved = CellularAutomataUpdater::liquid_step(state, index, &FlowProfile::OIL);
            if let Some(to) = moved {
                index = to;
            }

            if ChemistrySystem::try_ignite(
                state,
                index,
                OIL_IGNITION_TEMPERATURE,
                OIL_IGNITION_CHANCE,
            ) {
                return;
            }

            if moved.is_none() {
                break;
            }
        }
    }

    fn update_acid<R: SimRng>(state: &mut TickState<'_, R>, index: usize, config: &SimConfig) {
        if state.age(index) {
            return;
        }

        if let Some(rate) = MaterialKind::Acid.properties().dissolve_rate {
            ChemistrySystem::dissolve_neighbors(state, index, rate);
        }

        let mut index = index;
        for _ in 0..config.gravity_substeps() {
            match CellularAutomataUpdater::liquid_step(state, index, &FlowProfile::ACID) {
                Some(to) => index = to,
                None => break,
            }
        }
    }

    fn update_ice<R: SimRng>(state: &mut TickState<'_, R>, index: usize) {
        StateChangeSystem::melt_ice(state, index);
        StateChangeSystem::chill_adjacent_water(state, index);
    }

    fn update_fire<R: SimRng>(state: &mut TickState<'_, R>, index: usize) {
        if state.age(index) {
            return;
        }

        let index = CellularAutomataUpdater::rise_step(state, index).unwrap_or(index);
        ChemistrySystem::radiate_fire(state, index);
        ChemistrySystem::emit_steam(state, index);
        ChemistrySystem::flicker(state, index);
    }

    fn update_steam<R: SimRng>(state: &mut TickState<'_, R>, index: usize) {
        state.meta_mut(index).lifespan -= 1;
        if StateChangeSystem::resolve_steam(state, index) {
            return;
        }

        let index = CellularAutomataUpdater::rise_step(state, index)
            .or_else(|| CellularAutomataUpdater::spread_step(state, index))
            .unwrap_or(index);
        state.meta_mut(index).temperature -= STEAM_COOLING;
    }

    fn update_plant<R: SimRng>(state: &mut TickState<'_, R>, index: usize) {
        if let Some(rate) = MaterialKind::Plant.properties().growth_rate {
            ChemistrySystem::grow_plant(state, index, rate);
        }

        ChemistrySystem::try_ignite(
            state,
            index,
            PLANT_IGNITION_TEMPERATURE,
            PLANT_IGNITION_CHANCE,
        );
    }
}

/// Index of the `i`-th visited cell of row `y`
#[inline]
fn row_index(width: i32, y: i32, i: i32) -> usize {
    let x = if y % 2 == 0 { i } else { width - 1 - i };
    y as usize * width as usize + x as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::test_support::FixedRng;
    use crate::world::{NoopStats, TickStats};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn run(grid: &mut Grid, config: &SimConfig, ticks: usize, seed: u64) {
        let mut engine = UpdateEngine::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        for _ in 0..ticks {
            engine.tick(grid, config, &mut NoopStats, &mut rng);
        }
    }

    #[test]
    fn test_row_order_alternates() {
        let even: Vec<usize> = (0..4).map(|i| row_index(4, 0, i)).collect();
        let odd: Vec<usize> = (0..4).map(|i| row_index(4, 1, i)).collect();
        assert_eq!(even, vec![0, 1, 2, 3]);
        assert_eq!(odd, vec![7, 6, 5, 4]);
    }

    #[test]
    fn test_sand_moves_once_per_tick() {
        let mut grid = Grid::new(1, 6).unwrap();
        grid.set(0, 0, MaterialKind::Sand);

        run(&mut grid, &SimConfig::default(), 1, 1);
        assert_eq!(grid.get(0, 1), Some(MaterialKind::Sand));
    }

    #[test]
    fn test_gravity_strength_adds_substeps() {
        let mut grid = Grid::new(1, 8).unwrap();
        grid.set(0, 0, MaterialKind::Sand);
        let mut config = SimConfig::default();
        config.set_gravity_strength(3);

        run(&mut grid, &config, 1, 1);
        assert_eq!(grid.get(0, 3), Some(MaterialKind::Sand));
    }

    #[test]
    fn test_steam_rises_once_per_tick() {
        let mut grid = Grid::new(1, 6).unwrap();
        grid.set(0, 5, MaterialKind::Steam);

        run(&mut grid, &SimConfig::default(), 1, 1);
        assert_eq!(grid.get(0, 4), Some(MaterialKind::Steam));
        let meta = grid.metadata(0, 4).unwrap();
        assert_eq!(meta.lifespan, 199);
    }

    #[test]
    fn test_fire_dies_after_lifespan() {
        let mut grid = Grid::new(1, 1).unwrap();
        grid.set(0, 0, MaterialKind::Fire);

        run(&mut grid, &SimConfig::default(), 99, 5);
        assert_eq!(grid.get(0, 0), Some(MaterialKind::Fire));

        run(&mut grid, &SimConfig::default(), 1, 5);
        assert_eq!(grid.get(0, 0), Some(MaterialKind::Empty));
    }

    #[test]
    fn test_fire_pushed_up_by_sand_still_ages() {
        let mut grid = Grid::new(1, 3).unwrap();
        grid.set(0, 0, MaterialKind::Sand);
        grid.set(0, 1, MaterialKind::Fire);
        grid.set(0, 2, MaterialKind::Wall);

        run(&mut grid, &SimConfig::default(), 1, 3);
        assert_eq!(grid.get(0, 0), Some(MaterialKind::Fire));
        assert_eq!(grid.get(0, 1), Some(MaterialKind::Sand));
        assert_eq!(grid.metadata(0, 0).unwrap().lifespan, 99);
    }

    #[test]
    fn test_steam_pushed_up_by_water_still_ages() {
        let mut grid = Grid::new(1, 3).unwrap();
        grid.set(0, 0, MaterialKind::Water);
        grid.set(0, 1, MaterialKind::Steam);
        grid.set(0, 2, MaterialKind::Wall);

        run(&mut grid, &SimConfig::default(), 1, 3);
        assert_eq!(grid.get(0, 0), Some(MaterialKind::Steam));
        assert_eq!(grid.metadata(0, 0).unwrap().lifespan, 199);
    }

    #[test]
    fn test_melting_ice_still_chills_its_neighbors() {
        let mut grid = Grid::new(2, 1).unwrap();
        grid.set(0, 0, MaterialKind::Ice);
        grid.set(1, 0, MaterialKind::Water);
        grid.metadata_at_mut(1).temperature = 0.5;

        // Every roll succeeds: the ice melts and the chilled water freezes
        let mut engine = UpdateEngine::new();
        engine.tick(&mut grid, &SimConfig::default(), &mut NoopStats, &mut FixedRng(0.0));

        assert_eq!(grid.get(0, 0), Some(MaterialKind::Water));
        assert_eq!(grid.get(1, 0), Some(MaterialKind::Ice));
    }

    #[test]
    fn test_acid_expires() {
        let mut grid = Grid::new(1, 1).unwrap();
        grid.set(0, 0, MaterialKind::Acid);

        run(&mut grid, &SimConfig::default(), 499, 5);
        assert_eq!(grid.get(0, 0), Some(MaterialKind::Acid));
        run(&mut grid, &SimConfig::default(), 1, 5);
        assert_eq!(grid.get(0, 0), Some(MaterialKind::Empty));
    }

    #[test]
    fn test_stats_count_moves() {
        let mut grid = Grid::new(1, 4).unwrap();
        grid.set(0, 0, MaterialKind::Sand);
        let mut engine = UpdateEngine::new();
        let mut stats = TickStats::default();

        engine.tick(&mut grid, &SimConfig::default(), &mut stats, &mut FixedRng(0.5));
        assert_eq!(stats.cells_moved, 1);
        assert_eq!(stats.state_changes, 0);
    }

    #[test]
    fn test_engine_handles_grid_resize() {
        let mut engine = UpdateEngine::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);

        let mut small = Grid::new(2, 2).unwrap();
        engine.tick(&mut small, &SimConfig::default(), &mut NoopStats, &mut rng);

        let mut large = Grid::new(10, 10).unwrap();
        large.set(9, 0, MaterialKind::Sand);
        engine.tick(&mut large, &SimConfig::default(), &mut NoopStats, &mut rng);
        assert_eq!(large.get(9, 1), Some(MaterialKind::Sand));
    }
}
