//! World management - the cell grid and what the rules need to query it

mod grid;
mod neighbor_queries;
pub mod rng_trait;
pub mod stats;
#[allow(clippy::module_inception)]
mod world;

pub use grid::Grid;
pub use neighbor_queries::{MOORE_OFFSETS, NeighborQueries, Neighbors};
pub use rng_trait::SimRng;
pub use stats::{NoopStats, SimStats, TickStats};
pub use world::World;
