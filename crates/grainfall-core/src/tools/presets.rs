//! Canned structures built from rasterizer primitives

use std::fmt;
use std::str::FromStr;

use grainfall_simulation::MaterialKind;
use serde::{Deserialize, Serialize};

use super::shapes::ShapeRasterizer;
use crate::SimError;
use crate::world::{Grid, SimRng};

/// Structures the input layer can drop into the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Barrier,
    Funnel,
    Container,
    Hourglass,
    Maze,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Barrier,
        Preset::Funnel,
        Preset::Container,
        Preset::Hourglass,
        Preset::Maze,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Barrier => "barrier",
            Preset::Funnel => "funnel",
            Preset::Container => "container",
            Preset::Hourglass => "hourglass",
            Preset::Maze => "maze",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| SimError::UnknownPreset(s.to_string()))
    }
}

const BARRIER_HALF_WIDTH: i32 = 20;

const FUNNEL_HALF_WIDTH: i32 = 20;
const FUNNEL_HEIGHT: i32 = 15;
const FUNNEL_NECK: i32 = 3;

const CONTAINER_HALF_WIDTH: i32 = 20;
const CONTAINER_HALF_HEIGHT: i32 = 15;

const HOURGLASS_HALF_WIDTH: i32 = 15;
const HOURGLASS_HALF_HEIGHT: i32 = 20;
const HOURGLASS_NECK: i32 = 2;
const HOURGLASS_SAND_FILL: f32 = 0.7;

const MAZE_HALF_WIDTH: i32 = 30;
const MAZE_HALF_HEIGHT: i32 = 20;
const MAZE_DIVIDER_SPACING: i32 = 10;
const MAZE_GAP: i32 = 6;

/// No preset draws further than this from its center
const PRESET_REACH: i32 = 64;

/// Builds [`Preset`] structures centered on a point
pub struct PresetComposer;

impl PresetComposer {
    pub fn create<R: SimRng + ?Sized>(
        grid: &mut Grid,
        preset: Preset,
        x: i32,
        y: i32,
        rng: &mut R,
    ) {
        log::debug!("Creating {preset} at ({x}, {y})");

        // Centers this far out draw nothing either way; clamping keeps the
        // offsets below from overflowing
        let x = x.clamp(-PRESET_REACH, grid.width().saturating_add(PRESET_REACH));
        let y = y.clamp(-PRESET_REACH, grid.height().saturating_add(PRESET_REACH));

        match preset {
            Preset::Barrier => Self::barrier(grid, x, y),
            Preset::Funnel => Self::funnel(grid, x, y, rng),
            Preset::Container => Self::container(grid, x, y),
            Preset::Hourglass => Self::hourglass(grid, x, y, rng),
            Preset::Maze => Self::maze(grid, x, y, rng),
        }
    }

    /// Three-cell-thick horizontal wall
    fn barrier(grid: &mut Grid, x: i32, y: i32) {
        ShapeRasterizer::stamp_rect(
            grid,
            x - BARRIER_HALF_WIDTH,
            y - 1,
            x + BARRIER_HALF_WIDTH,
            y + 1,
            MaterialKind::Wall,
            true,
        );
    }

    /// Two slopes meeting at an open neck below the center
    fn funnel<R: SimRng + ?Sized>(grid: &mut Grid, x: i32, y: i32, rng: &mut R) {
        let top = y - FUNNEL_HEIGHT / 2;
        let bottom = y + FUNNEL_HEIGHT / 2;
        for side in [-1, 1] {
            ShapeRasterizer::stamp_line(
                grid,
                x + side * FUNNEL_HALF_WIDTH,
                top,
                x + side * FUNNEL_NECK,
                bottom,
                MaterialKind::Wall,
                1,
                rng,
            );
        }
    }

    /// Open-topped box
    fn container(grid: &mut Grid, x: i32, y: i32) {
        let (left, right) = (x - CONTAINER_HALF_WIDTH, x + CONTAINER_HALF_WIDTH);
        let (top, bottom) = (y - CONTAINER_HALF_HEIGHT, y + CONTAINER_HALF_HEIGHT);

        ShapeRasterizer::stamp_rect(grid, left, top, left + 2, bottom, MaterialKind::Wall, true);
        ShapeRasterizer::stamp_rect(grid, right - 2, top, right, bottom, MaterialKind::Wall, true);
        ShapeRasterizer::stamp_rect(grid, left, bottom - 2, right, bottom, MaterialKind::Wall, true);
    }

    /// Closed hourglass with sand in the top chamber
    fn hourglass<R: SimRng + ?Sized>(grid: &mut Grid, x: i32, y: i32, rng: &mut R) {
        let (left, right) = (x - HOURGLASS_HALF_WIDTH, x + HOURGLASS_HALF_WIDTH);
        let (top, bottom) = (y - HOURGLASS_HALF_HEIGHT, y + HOURGLASS_HALF_HEIGHT);

        ShapeRasterizer::stamp_line(grid, left, top, right, top, MaterialKind::Wall, 1, rng);
        ShapeRasterizer::stamp_line(grid, left, bottom, right, bottom, MaterialKind::Wall, 1, rng);
        for side in [-1, 1] {
            let rim = x + side * HOURGLASS_HALF_WIDTH;
            let neck = x + side * HOURGLASS_NECK;
            ShapeRasterizer::stamp_line(grid, rim, top, neck, y, MaterialKind::Wall, 1, rng);
            ShapeRasterizer::stamp_line(grid, neck, y, rim, bottom, MaterialKind::Wall, 1, rng);
        }

        // Row by row so the fill follows the slanted walls
        for row in (top + 3)..(y - HOURGLASS_HALF_HEIGHT / 4) {
            let half = Self::hourglass_half_width(row - y) - 2;
            if half < 0 {
                continue;
            }
            ShapeRasterizer::scatter_rect(
                grid,
                x - half,
                row,
                x + half,
                row,
                MaterialKind::Sand,
                HOURGLASS_SAND_FILL,
                rng,
            );
        }
    }

    /// Wall offset from the center at `dy` rows from the neck
    fn hourglass_half_width(dy: i32) -> i32 {
        HOURGLASS_NECK + (HOURGLASS_HALF_WIDTH - HOURGLASS_NECK) * dy.abs() / HOURGLASS_HALF_HEIGHT
    }

    /// Walled box split by vertical dividers, each with one gap at a random height
    fn maze<R: SimRng + ?Sized>(grid: &mut Grid, x: i32, y: i32, rng: &mut R) {
        let (left, right) = (x - MAZE_HALF_WIDTH, x + MAZE_HALF_WIDTH);
        let (top, bottom) = (y - MAZE_HALF_HEIGHT, y + MAZE_HALF_HEIGHT);

        ShapeRasterizer::stamp_rect(grid, left, top, right, bottom, MaterialKind::Wall, false);

        let inner_height = (bottom - top - 1 - MAZE_GAP).max(1) as usize;
        let mut divider = left + MAZE_DIVIDER_SPACING;
        while divider < right {
            let gap_top = top + 1 + rng.gen_index(inner_height) as i32;
            let gap_bottom = gap_top + MAZE_GAP - 1;

            if gap_top > top + 1 {
                ShapeRasterizer::stamp_rect(
                    grid,
                    divider,
                    top + 1,
                    divider,
                    gap_top - 1,
                    MaterialKind::Wall,
                    true,
                );
            }
            if gap_bottom < bottom - 1 {
                ShapeRasterizer::stamp_rect(
                    grid,
                    divider,
                    gap_bottom + 1,
                    divider,
                    bottom - 1,
                    MaterialKind::Wall,
                    true,
                );
            }
            divider += MAZE_DIVIDER_SPACING;
        }
    }
}
