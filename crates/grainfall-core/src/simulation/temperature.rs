//! Temperature simulation - heat exchange between neighboring cells

use grainfall_simulation::AMBIENT_TEMPERATURE;

use crate::world::{Grid, MOORE_OFFSETS};

/// Fraction of the temperature difference that counts as flow
pub const DIFFUSION_RATE: f32 = 0.1;
/// Share of the flow applied to each side of a pair
pub const EXCHANGE_FRACTION: f32 = 0.5;
/// Per-tick pull of every occupied cell toward ambient
pub const AMBIENT_RELAXATION: f32 = 0.001;

/// Temperature simulator (pass C of a tick)
pub struct TemperatureSimulator;

impl TemperatureSimulator {
    /// Move heat from `a` toward `b`; the sum of both stays the same
    #[inline]
    pub fn exchange(a: &mut f32, b: &mut f32) {
        let delta = (*a - *b) * DIFFUSION_RATE;
        *a -= delta * EXCHANGE_FRACTION;
        *b += delta * EXCHANGE_FRACTION;
    }

    /// One diffusion sweep in index order
    ///
    /// Every non-empty cell exchanges heat with each in-grid Moore neighbor,
    /// in place, then relaxes slightly toward ambient. Empty cells only
    /// receive heat from occupied neighbors.
    pub fn diffuse(grid: &mut Grid) {
        Self::diffuse_with_relaxation(grid, AMBIENT_RELAXATION);
    }

    pub(crate) fn diffuse_with_relaxation(grid: &mut Grid, relaxation: f32) {
        for index in 0..grid.len() {
            if grid.kind_at(index).is_empty() {
                continue;
            }

            for &(dx, dy) in &MOORE_OFFSETS {
                if let Some(neighbor) = grid.offset(index, dx, dy) {
                    let (own, other) = grid.temperature_pair_mut(index, neighbor);
                    Self::exchange(own, other);
                }
            }

            let meta = grid.metadata_at_mut(index);
            meta.temperature += (AMBIENT_TEMPERATURE - meta.temperature) * relaxation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grainfall_simulation::MaterialKind;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256StarStar;

    fn total_heat(grid: &Grid) -> f64 {
        grid.metadata_slice()
            .iter()
            .map(|m| m.temperature as f64)
            .sum()
    }

    #[test]
    fn test_exchange_conserves_pair_sum() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        for _ in 0..1000 {
            let mut a: f32 = rng.gen_range(-50.0..500.0);
            let mut b: f32 = rng.gen_range(-50.0..500.0);
            let before = a + b;
            TemperatureSimulator::exchange(&mut a, &mut b);
            assert!((a + b - before).abs() < 1e-3, "{before} -> {}", a + b);
        }
    }

    #[test]
    fn test_exchange_moves_toward_each_other() {
        let mut hot = 100.0;
        let mut cold = 0.0;
        TemperatureSimulator::exchange(&mut hot, &mut cold);
        assert_eq!(hot, 95.0);
        assert_eq!(cold, 5.0);
    }

    #[test]
    fn test_pass_conserves_heat_without_relaxation() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        let mut grid = Grid::new(16, 12).unwrap();
        for index in 0..grid.len() {
            if rng.gen_bool(0.6) {
                grid.set_at(index, MaterialKind::Sand);
            }
            grid.metadata_at_mut(index).temperature = rng.gen_range(-20.0..400.0);
        }

        let before = total_heat(&grid);
        TemperatureSimulator::diffuse_with_relaxation(&mut grid, 0.0);
        let after = total_heat(&grid);

        assert!((after - before).abs() < 0.5, "{before} -> {after}");
    }

    #[test]
    fn test_empty_cells_only_receive_heat() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.metadata_at_mut(0).temperature = 300.0;
        grid.set(1, 0, MaterialKind::Wall);

        TemperatureSimulator::diffuse(&mut grid);

        // The hot empty cell at 0 was never a source, only a neighbor of 1
        assert!(grid.metadata_at(0).temperature < 300.0);
        assert!(grid.metadata_at(1).temperature > AMBIENT_TEMPERATURE);
        assert!(grid.metadata_at(2).temperature > AMBIENT_TEMPERATURE);
    }

    #[test]
    fn test_lone_particle_relaxes_to_ambient() {
        let mut grid = Grid::new(1, 1).unwrap();
        grid.set(0, 0, MaterialKind::Sand);
        grid.metadata_at_mut(0).temperature = 120.0;

        TemperatureSimulator::diffuse(&mut grid);

        let expected = 120.0 + (AMBIENT_TEMPERATURE - 120.0) * AMBIENT_RELAXATION;
        assert_eq!(grid.metadata_at(0).temperature, expected);
    }
}
