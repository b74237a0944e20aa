//! # Grainfall
//!
//! Headless front end for the falling-sand engine: layered configuration,
//! scripted scenarios standing in for the input layer, and a CPU renderer
//! for PNG snapshots.

pub mod config;
pub mod render;
pub mod scenario;

// Re-export core modules for convenience
pub use grainfall_core::simulation;
pub use grainfall_core::tools;
pub use grainfall_core::world;
pub use grainfall_core::{MaterialKind, SimError};
