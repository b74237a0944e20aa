//! Simulation rules and the tick scheduler

pub mod ca_update;
pub mod chemistry_system;
mod config;
mod engine;
pub mod state_changes;
pub mod temperature;
mod tick_state;

#[cfg(test)]
pub(crate) mod test_support;

pub use ca_update::{CellularAutomataUpdater, FlowProfile};
pub use chemistry_system::ChemistrySystem;
pub use config::{MAX_BRUSH_SIZE, SimConfig};
pub use engine::{STEAM_COOLING, UpdateEngine};
pub use state_changes::StateChangeSystem;
pub use temperature::TemperatureSimulator;
pub use tick_state::TickState;
