//! Drawing tools - primitives and presets the input layer calls between ticks

mod presets;
mod shapes;

pub use presets::{Preset, PresetComposer};
pub use shapes::{DrawRequest, Shape, ShapeRasterizer};
