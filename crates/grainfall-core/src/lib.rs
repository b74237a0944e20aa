//! # Grainfall core
//!
//! The falling-sand engine: a fixed-size cell grid, the multi-pass update
//! engine that runs one simulation tick over it, and the drawing primitives
//! and presets the input layer uses to put material into it.

pub mod error;
pub mod simulation;
pub mod tools;
pub mod world;

pub use error::SimError;

// Re-export from grainfall-simulation so callers need a single dependency
pub use grainfall_simulation::{
    AMBIENT_TEMPERATURE, CellMetadata, MaterialKind, MaterialProperties, UnknownMaterial,
};
