//! State change system
//!
//! Handles material state transitions based on temperature:
//! - Boiling (water → steam) and freezing (water → ice)
//! - Melting (ice → water) and chilling of water next to ice
//! - Condensing or dissipating steam at the end of its life

use grainfall_simulation::{AMBIENT_TEMPERATURE, MaterialKind};

use super::TickState;
use crate::world::SimRng;

pub const BOILING_POINT: f32 = 99.0;
pub const FREEZING_POINT: f32 = 0.0;
pub const BOIL_CHANCE: f32 = 0.1;
pub const FREEZE_CHANCE: f32 = 0.05;

/// Steam below this temperature resolves
pub const CONDENSATION_POINT: f32 = 90.0;
pub const CONDENSE_CHANCE: f32 = 0.2;

/// Temperature of freshly melted water
pub const MELTWATER_TEMPERATURE: f32 = 2.0;
pub const CHILL_CHANCE: f32 = 0.02;
pub const CHILL_AMOUNT: f32 = 1.0;
pub const CHILL_FREEZE_CHANCE: f32 = 0.1;

/// System for checking and applying state changes
pub struct StateChangeSystem;

impl StateChangeSystem {
    /// Boil or freeze the water at `index`
    ///
    /// Returns true if the cell is no longer water.
    pub fn water_phase_change<R: SimRng>(state: &mut TickState<'_, R>, index: usize) -> bool {
        let temperature = state.meta(index).temperature;

        if temperature > BOILING_POINT && state.chance(BOIL_CHANCE) {
            state.convert(index, MaterialKind::Steam);
            return true;
        }

        if temperature < FREEZING_POINT && state.chance(FREEZE_CHANCE) {
            state.convert(index, MaterialKind::Ice);
            return true;
        }

        false
    }

    /// End-of-life check for the steam at `index`, after its lifespan tick
    ///
    /// Expired or cooled steam turns into ambient empty space, or condenses
    /// back into water when it cooled. Returns true if the steam resolved.
    pub fn resolve_steam<R: SimRng>(state: &mut TickState<'_, R>, index: usize) -> bool {
        let meta = state.meta(index);
        let cooled = meta.temperature < CONDENSATION_POINT;
        if meta.lifespan > 0 && !cooled {
            return false;
        }

        if cooled && state.chance(CONDENSE_CHANCE) {
            state.convert(index, MaterialKind::Water);
            state.meta_mut(index).temperature = AMBIENT_TEMPERATURE;
        } else {
            state.convert(index, MaterialKind::Empty);
        }
        true
    }

    /// Melt the ice at `index` with a chance proportional to its temperature
    ///
    /// Returns true if it melted.
    pub fn melt_ice<R: SimRng>(state: &mut TickState<'_, R>, index: usize) -> bool {
        let Some(melt_rate) = state.kind(index).properties().melt_rate else {
            return false;
        };
        let temperature = state.meta(index).temperature;
        if temperature <= FREEZING_POINT || !state.chance(melt_rate * temperature) {
            return false;
        }

        state.convert(index, MaterialKind::Water);
        state.meta_mut(index).temperature = MELTWATER_TEMPERATURE;
        true
    }

    /// Cool the water around the ice at `index`, sometimes freezing it
    pub fn chill_adjacent_water<R: SimRng>(state: &mut TickState<'_, R>, index: usize) {
        for neighbor in state.neighbors_of_kind(index, MaterialKind::Water) {
            if !state.chance(CHILL_CHANCE) {
                continue;
            }

            let meta = state.meta_mut(neighbor);
            meta.temperature -= CHILL_AMOUNT;
            let frozen = meta.temperature < FREEZING_POINT;

            if frozen && state.chance(CHILL_FREEZE_CHANCE) {
                state.convert(neighbor, MaterialKind::Ice);
            }
        }
    }
}
