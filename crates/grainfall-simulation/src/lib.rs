//! Material simulation data for Grainfall
//!
//! This crate provides the foundational data types for the cellular automaton:
//! - Material identifiers and their physical properties (MaterialKind, MaterialProperties)
//! - Per-cell metadata carried alongside every material (CellMetadata)

mod cell;
mod materials;

pub use cell::{AMBIENT_TEMPERATURE, CellMetadata};
pub use materials::{MaterialKind, MaterialProperties, UnknownMaterial};
