//! Scenario actions
//!
//! Each action stands in for something the input layer or the frame
//! scheduler would do between frames.

use grainfall_core::MaterialKind;
use grainfall_core::tools::{DrawRequest, Preset};
use serde::{Deserialize, Serialize};

use super::verification::VerificationCondition;
use crate::render::RenderMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScenarioAction {
    // === DRAWING ===
    /// Stamp a shape through the rasterizer
    Draw(DrawRequest),

    /// Solid circle at the current brush size
    Brush {
        x: i32,
        y: i32,
        material: MaterialKind,
    },

    /// Build a preset structure centered on a point
    Preset { preset: Preset, x: i32, y: i32 },

    /// Reset every cell to empty
    Clear,

    // === SETTINGS ===
    SetGravity { strength: u32 },

    SetBrushSize { size: u32 },

    SetSimSpeed { ticks_per_frame: u32 },

    // === TIME ===
    /// Run single ticks, ignoring the speed multiplier
    RunTicks { ticks: u32 },

    /// Run whole frames (`sim_speed` ticks each)
    RunFrames { frames: u32 },

    /// Run frames until the condition holds
    WaitUntil {
        condition: VerificationCondition,
        timeout_frames: u32,
    },

    // === OUTPUT ===
    /// Render the grid to a PNG in the snapshot directory
    Snapshot {
        filename: String,
        #[serde(default)]
        mode: Option<RenderMode>,
    },

    Log { message: String },
}
