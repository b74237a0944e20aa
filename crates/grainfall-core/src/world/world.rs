//! World - the grid plus everything needed to step and draw into it

use grainfall_simulation::MaterialKind;

use super::{Grid, SimRng, SimStats};
use crate::SimError;
use crate::simulation::{SimConfig, UpdateEngine};
use crate::tools::{DrawRequest, Preset, PresetComposer, ShapeRasterizer};

/// Main world simulation
///
/// This is the surface the input layer talks to: drawing calls happen
/// between ticks, and `update` runs one frame's worth of ticks.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    config: SimConfig,
    engine: UpdateEngine,
}

impl World {
    pub fn new(width: i32, height: i32) -> Result<Self, SimError> {
        Self::with_config(width, height, SimConfig::default())
    }

    pub fn with_config(width: i32, height: i32, config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let grid = Grid::new(width, height)?;
        log::info!("Created {width}x{height} world ({} cells)", grid.len());

        Ok(Self {
            grid,
            config,
            engine: UpdateEngine::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SimConfig {
        &mut self.config
    }

    pub fn stamp_point(&mut self, x: i32, y: i32, kind: MaterialKind) {
        ShapeRasterizer::stamp_point(&mut self.grid, x, y, kind);
    }

    pub fn stamp_circle<R: SimRng + ?Sized>(
        &mut self,
        x: i32,
        y: i32,
        kind: MaterialKind,
        radius: u32,
        probability: f32,
        rng: &mut R,
    ) {
        ShapeRasterizer::stamp_circle(&mut self.grid, x, y, kind, radius, probability, rng);
    }

    /// Solid circle with the configured brush size
    pub fn stamp_brush<R: SimRng + ?Sized>(
        &mut self,
        x: i32,
        y: i32,
        kind: MaterialKind,
        rng: &mut R,
    ) {
        let radius = self.config.brush_size;
        ShapeRasterizer::stamp_circle(&mut self.grid, x, y, kind, radius, 1.0, rng);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn stamp_line<R: SimRng + ?Sized>(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        kind: MaterialKind,
        thickness: u32,
        rng: &mut R,
    ) {
        ShapeRasterizer::stamp_line(&mut self.grid, x1, y1, x2, y2, kind, thickness, rng);
    }

    pub fn stamp_rect(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        kind: MaterialKind,
        filled: bool,
    ) {
        ShapeRasterizer::stamp_rect(&mut self.grid, x1, y1, x2, y2, kind, filled);
    }

    pub fn apply<R: SimRng + ?Sized>(&mut self, request: &DrawRequest, rng: &mut R) {
        ShapeRasterizer::apply(&mut self.grid, request, rng);
    }

    pub fn create_preset<R: SimRng + ?Sized>(
        &mut self,
        preset: Preset,
        x: i32,
        y: i32,
        rng: &mut R,
    ) {
        PresetComposer::create(&mut self.grid, preset, x, y, rng);
    }

    /// Reset every cell to empty at ambient temperature
    pub fn clear(&mut self) {
        self.grid.clear();
        log::debug!("World cleared");
    }

    /// Replace the grid with an empty one of the new size
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), SimError> {
        self.grid = Grid::new(width, height)?;
        log::info!("Resized world to {width}x{height}");
        Ok(())
    }

    /// Run a single simulation tick
    pub fn tick<R: SimRng>(&mut self, stats: &mut dyn SimStats, rng: &mut R) {
        self.engine.tick(&mut self.grid, &self.config, stats, rng);
    }

    /// Run one frame: `sim_speed` ticks, strictly one after another
    pub fn update<R: SimRng>(&mut self, stats: &mut dyn SimStats, rng: &mut R) {
        for _ in 0..self.config.sim_speed.max(1) {
            self.tick(stats, rng);
        }
    }
}
