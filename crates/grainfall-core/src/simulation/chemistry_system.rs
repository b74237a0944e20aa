//! Chemistry system for fire, burning, ignition, and chemical reactions

use grainfall_simulation::MaterialKind;

use super::TickState;
use crate::world::SimRng;

/// Chance per tick that water puts out each adjacent fire cell
pub const EXTINGUISH_CHANCE: f32 = 0.4;

pub const OIL_IGNITION_TEMPERATURE: f32 = 220.0;
pub const OIL_IGNITION_CHANCE: f32 = 0.2;
pub const PLANT_IGNITION_TEMPERATURE: f32 = 150.0;
pub const PLANT_IGNITION_CHANCE: f32 = 0.1;

/// Heat a fire cell adds to each neighbor per tick
pub const FIRE_HEAT: f32 = 5.0;
pub const FIRE_SPREAD_CHANCE: f32 = 0.1;
pub const FIRE_STEAM_CHANCE: f32 = 0.05;
pub const FIRE_MIN_TEMPERATURE: f32 = 350.0;
pub const FIRE_TEMPERATURE_RANGE: f32 = 100.0;

/// Handles chemistry simulation: fire, burning, ignition, and reactions
pub struct ChemistrySystem;

impl ChemistrySystem {
    /// Water at `index` turns adjacent fire into steam
    pub fn extinguish_adjacent_fire<R: SimRng>(state: &mut TickState<'_, R>, index: usize) {
        for neighbor in state.neighbors_of_kind(index, MaterialKind::Fire) {
            if state.chance(EXTINGUISH_CHANCE) {
                state.react(neighbor, MaterialKind::Steam);
            }
        }
    }

    /// Ignite the cell at `index` if it is hot enough or touches fire
    ///
    /// Returns true if the cell caught fire.
    pub fn try_ignite<R: SimRng>(
        state: &mut TickState<'_, R>,
        index: usize,
        ignition_temperature: f32,
        chance: f32,
    ) -> bool {
        let hot = state.meta(index).temperature > ignition_temperature;
        if !(hot || state.has_neighbor(index, MaterialKind::Fire)) || !state.chance(chance) {
            return false;
        }

        state.react(index, MaterialKind::Fire);
        true
    }

    /// Heat every neighbor of the fire at `index` and spread to flammables
    pub fn radiate_fire<R: SimRng>(state: &mut TickState<'_, R>, index: usize) {
        for neighbor in state.neighbors(index) {
            state.meta_mut(neighbor).temperature += FIRE_HEAT;

            if state.kind(neighbor).properties().flammable && state.chance(FIRE_SPREAD_CHANCE) {
                state.react(neighbor, MaterialKind::Fire);
            }
        }
    }

    /// Occasionally puff steam into the empty cell above the fire
    pub fn emit_steam<R: SimRng>(state: &mut TickState<'_, R>, index: usize) {
        let Some(above) = state.offset(index, 0, -1) else {
            return;
        };
        if state.kind(above).is_empty() && state.chance(FIRE_STEAM_CHANCE) {
            state.react(above, MaterialKind::Steam);
        }
    }

    /// Fire burns at a random 350-450 °C every tick
    pub fn flicker<R: SimRng>(state: &mut TickState<'_, R>, index: usize) {
        let roll = state.rng().gen_f32();
        state.meta_mut(index).temperature = FIRE_MIN_TEMPERATURE + roll * FIRE_TEMPERATURE_RANGE;
    }

    /// Let the acid at `index` eat its neighbors
    ///
    /// Each candidate needs two successful rolls: one at the acid's
    /// `dissolve_rate`, one at `dissolve_rate` scaled by the target's
    /// resistance. A wall therefore goes with 0.2 * 0.02 = 0.4% per tick.
    pub fn dissolve_neighbors<R: SimRng>(
        state: &mut TickState<'_, R>,
        index: usize,
        dissolve_rate: f32,
    ) {
        for neighbor in state.neighbors(index) {
            let target = state.kind(neighbor);
            if matches!(
                target,
                MaterialKind::Empty | MaterialKind::Acid | MaterialKind::Steam
            ) {
                continue;
            }

            if state.chance(dissolve_rate)
                && state.chance(dissolve_rate * Self::resist_factor(target))
            {
                state.react(neighbor, MaterialKind::Empty);
            }
        }
    }

    /// How well a material withstands acid (1.0 = not at all)
    pub fn resist_factor(kind: MaterialKind) -> f32 {
        match kind {
            MaterialKind::Wall => 0.1,
            MaterialKind::Sand => 0.5,
            _ => 1.0,
        }
    }

    /// Plants next to water grow into a random empty neighbor
    pub fn grow_plant<R: SimRng>(state: &mut TickState<'_, R>, index: usize, growth_rate: f32) {
        if !state.has_neighbor(index, MaterialKind::Water) || !state.chance(growth_rate) {
            return;
        }

        let empty = state.neighbors_of_kind(index, MaterialKind::Empty);
        if empty.is_empty() {
            return;
        }
        let target = empty[state.rng().gen_index(empty.len())];
        state.react(target, MaterialKind::Plant);
    }
}
