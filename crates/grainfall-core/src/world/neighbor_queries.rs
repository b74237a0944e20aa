//! Neighbor cell collection utilities

use super::grid::Grid;
use grainfall_simulation::MaterialKind;
use smallvec::SmallVec;

/// Moore neighborhood offsets
///
/// Order: NW, N, NE, W, E, SW, S, SE (y grows downwards)
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), // NW
    (0, -1),  // N
    (1, -1),  // NE
    (-1, 0),  // W
    (1, 0),   // E
    (-1, 1),  // SW
    (0, 1),   // S
    (1, 1),   // SE
];

/// In-grid neighbor indices, at most 8
pub type Neighbors = SmallVec<[usize; 8]>;

/// Neighbor collection utilities - stateless methods for querying neighboring cells
pub struct NeighborQueries;

impl NeighborQueries {
    /// Indices of all in-grid Moore neighbors of `index`
    ///
    /// Cells outside the grid are left out rather than reported as a material.
    pub fn moore(grid: &Grid, index: usize) -> Neighbors {
        MOORE_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| grid.offset(index, dx, dy))
            .collect()
    }

    /// Whether any Moore neighbor of `index` holds `kind`
    pub fn has_neighbor(grid: &Grid, index: usize, kind: MaterialKind) -> bool {
        MOORE_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| grid.offset(index, dx, dy))
            .any(|n| grid.kind_at(n) == kind)
    }

    /// Indices of Moore neighbors holding `kind`
    pub fn neighbors_of_kind(grid: &Grid, index: usize, kind: MaterialKind) -> Neighbors {
        MOORE_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| grid.offset(index, dx, dy))
            .filter(|&n| grid.kind_at(n) == kind)
            .collect()
    }
}
