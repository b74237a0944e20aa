//! Snapshot rendering

mod pixel_renderer;

pub use pixel_renderer::{PixelRenderer, RenderMode, material_color, temperature_to_color};
