//! CPU-based pixel buffer renderer for headless snapshots
//!
//! Renders the grid to an RGBA buffer without GPU dependencies, one
//! `cell_size x cell_size` block per cell.

use std::path::Path;

use anyhow::{Context, Result};
use grainfall_core::world::Grid;
use grainfall_core::{CellMetadata, MaterialKind};
use serde::{Deserialize, Serialize};

const BACKGROUND: [u8; 4] = [12, 12, 16, 255];

/// Fire color at full lifespan and just before burning out
const FIRE_FRESH: [u8; 3] = [255, 230, 120];
const FIRE_DYING: [u8; 3] = [140, 20, 0];

/// Steam never fades below this opacity while it exists
const STEAM_MIN_ALPHA: f32 = 0.15;

/// What the renderer colors cells by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Material base colors with lifespan effects
    #[default]
    Materials,
    /// Thermography heat map of every cell
    Temperature,
}

impl RenderMode {
    pub fn name(self) -> &'static str {
        match self {
            RenderMode::Materials => "materials",
            RenderMode::Temperature => "temperature",
        }
    }
}

/// Convert temperature to RGBA color
/// Cold = blue, room temp = cyan/green, hot = yellow/red, extreme = white
pub fn temperature_to_color(temp: f32) -> [u8; 4] {
    if temp < 0.0 {
        // Frozen: deep blue
        let t = (-temp).min(50.0) / 50.0;
        [0, (50.0 * (1.0 - t)) as u8, (150.0 + 105.0 * t) as u8, 255]
    } else if temp < 20.0 {
        // Cold: blue to cyan
        let t = temp / 20.0;
        [0, (128.0 * t) as u8, (200.0 - t * 50.0) as u8, 255]
    } else if temp < 100.0 {
        // Room temp to warm
        let t = (temp - 20.0) / 80.0;
        [0, (128.0 + t * 127.0) as u8, (150.0 - t * 150.0) as u8, 255]
    } else if temp < 500.0 {
        // Hot: green to yellow
        let t = (temp - 100.0) / 400.0;
        [(t * 255.0) as u8, 255, 0, 255]
    } else if temp < 1000.0 {
        // Very hot: yellow to red
        let t = (temp - 500.0) / 500.0;
        [255, (255.0 * (1.0 - t)) as u8, 0, 255]
    } else {
        // Extreme: red to white
        let t = ((temp - 1000.0) / 500.0).min(1.0);
        [255, (t * 200.0) as u8, (t * 200.0) as u8, 255]
    }
}

/// Color of one cell in [`RenderMode::Materials`]
pub fn material_color(kind: MaterialKind, meta: CellMetadata) -> [u8; 4] {
    match kind {
        MaterialKind::Empty => BACKGROUND,
        MaterialKind::Fire => {
            let t = meta.lifespan_ratio(kind);
            let mut color = [0, 0, 0, 255];
            for (channel, out) in color.iter_mut().take(3).enumerate() {
                *out = lerp(FIRE_DYING[channel], FIRE_FRESH[channel], t);
            }
            color
        }
        MaterialKind::Steam => {
            let alpha = meta.lifespan_ratio(kind).max(STEAM_MIN_ALPHA);
            blend(BACKGROUND, kind.properties().color, alpha)
        }
        _ => kind.properties().color,
    }
}

fn lerp(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t).round() as u8
}

/// Composite `color` over an opaque background at `alpha`
fn blend(background: [u8; 4], color: [u8; 4], alpha: f32) -> [u8; 4] {
    [
        lerp(background[0], color[0], alpha),
        lerp(background[1], color[1], alpha),
        lerp(background[2], color[2], alpha),
        255,
    ]
}

/// CPU-based renderer that outputs to a pixel buffer
pub struct PixelRenderer {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Pixels per cell side
    pub cell_size: usize,
    /// RGBA pixel buffer (4 bytes per pixel)
    pub buffer: Vec<u8>,
}

impl PixelRenderer {
    /// Create a renderer sized for `grid` at `cell_size` pixels per cell
    pub fn new(grid: &Grid, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1) as usize;
        let width = grid.width() as usize * cell_size;
        let height = grid.height() as usize * cell_size;
        Self {
            width,
            height,
            cell_size,
            buffer: vec![0u8; width * height * 4],
        }
    }

    /// Redraw every cell of `grid`
    ///
    /// The grid must have the dimensions the renderer was created with.
    pub fn render(&mut self, grid: &Grid, mode: RenderMode) {
        let columns = grid.width() as usize;
        let materials = grid.materials();
        let metadata = grid.metadata_slice();

        for (index, (kind, meta)) in materials.iter().zip(metadata).enumerate() {
            let color = match mode {
                RenderMode::Materials => material_color(*kind, *meta),
                RenderMode::Temperature => temperature_to_color(meta.temperature),
            };
            self.fill_cell(index % columns, index / columns, color);
        }
    }

    fn fill_cell(&mut self, cell_x: usize, cell_y: usize, color: [u8; 4]) {
        let x0 = cell_x * self.cell_size;
        let y0 = cell_y * self.cell_size;
        for y in y0..y0 + self.cell_size {
            let row = (y * self.width + x0) * 4;
            for pixel in self.buffer[row..row + self.cell_size * 4].chunks_exact_mut(4) {
                pixel.copy_from_slice(&color);
            }
        }
    }

    /// RGBA color of a pixel, if inside the image
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut color = [0u8; 4];
        color.copy_from_slice(&self.buffer[idx..idx + 4]);
        Some(color)
    }

    /// Write the buffer to a PNG file
    pub fn save_png(&self, path: &Path) -> Result<()> {
        use image::{ImageBuffer, Rgba};

        let img: ImageBuffer<Rgba<u8>, _> =
            ImageBuffer::from_raw(self.width as u32, self.height as u32, self.buffer.clone())
                .context("Failed to create image buffer")?;

        img.save(path)
            .with_context(|| format!("Failed to save snapshot to {}", path.display()))?;
        log::info!("Saved snapshot to {}", path.display());
        Ok(())
    }
}
