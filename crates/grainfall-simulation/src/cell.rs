//! Per-cell metadata
//!
//! Stored in a parallel array next to the material ids and always swapped
//! together with them, so a particle's heat and remaining life travel with it.

use crate::MaterialKind;
use serde::{Deserialize, Serialize};

/// Reference temperature every cell slowly relaxes toward (Celsius)
pub const AMBIENT_TEMPERATURE: f32 = 20.0;

/// Temperature and remaining lifespan of a single cell
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellMetadata {
    /// Celsius
    pub temperature: f32,
    /// Ticks left before the material's terminal transition (0 = unused)
    pub lifespan: i32,
}

impl CellMetadata {
    pub const AMBIENT: CellMetadata = CellMetadata {
        temperature: AMBIENT_TEMPERATURE,
        lifespan: 0,
    };

    /// Metadata for `kind` written into a cell whose previous metadata was `self`
    ///
    /// Empty cells go back to ambient. Materials with a spawn temperature
    /// (fire, steam) take it; everything else keeps the cell's temperature.
    /// Lifespan always restarts from the material's default.
    pub fn on_spawn(self, kind: MaterialKind) -> CellMetadata {
        if kind.is_empty() {
            return CellMetadata::AMBIENT;
        }

        let props = kind.properties();
        CellMetadata {
            temperature: props.spawn_temperature.unwrap_or(self.temperature),
            lifespan: props.default_lifespan,
        }
    }

    /// Remaining lifespan as a fraction of the material's default (1.0 when fresh)
    ///
    /// Materials without a lifespan report 1.0.
    pub fn lifespan_ratio(&self, kind: MaterialKind) -> f32 {
        let total = kind.properties().default_lifespan;
        if total <= 0 {
            return 1.0;
        }
        (self.lifespan as f32 / total as f32).clamp(0.0, 1.0)
    }
}

impl Default for CellMetadata {
    fn default() -> Self {
        Self::AMBIENT
    }
}
