//! Cell store - flat material array with co-indexed metadata

use crate::SimError;
use grainfall_simulation::{CellMetadata, MaterialKind};

/// Fixed-size grid of cells
///
/// Materials and metadata live in two parallel arrays sharing the index space
/// `y * width + x`. They are only ever moved together.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    materials: Vec<MaterialKind>,
    metadata: Vec<CellMetadata>,
}

impl Grid {
    /// Create an empty grid at ambient temperature
    pub fn new(width: i32, height: i32) -> Result<Self, SimError> {
        if width <= 0 || height <= 0 {
            return Err(SimError::InvalidDimensions { width, height });
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|len| *len <= isize::MAX as usize / size_of::<CellMetadata>())
            .ok_or(SimError::GridTooLarge { width, height })?;

        Ok(Self {
            width,
            height,
            materials: vec![MaterialKind::Empty; len],
            metadata: vec![CellMetadata::AMBIENT; len],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Flat index of a coordinate, `None` when out of bounds
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Coordinate of a flat index
    #[inline]
    pub fn coords(&self, index: usize) -> (i32, i32) {
        let w = self.width as usize;
        ((index % w) as i32, (index / w) as i32)
    }

    /// Index of the cell at `(dx, dy)` from `index`, `None` when that leaves the grid
    #[inline]
    pub fn offset(&self, index: usize, dx: i32, dy: i32) -> Option<usize> {
        let (x, y) = self.coords(index);
        self.index(x + dx, y + dy)
    }

    /// Material at a coordinate, `None` when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<MaterialKind> {
        self.index(x, y).map(|i| self.materials[i])
    }

    /// Metadata at a coordinate, `None` when out of bounds
    pub fn metadata(&self, x: i32, y: i32) -> Option<CellMetadata> {
        self.index(x, y).map(|i| self.metadata[i])
    }

    /// Write a material, initializing its metadata
    ///
    /// Out-of-bounds coordinates are ignored.
    pub fn set(&mut self, x: i32, y: i32, kind: MaterialKind) {
        if let Some(index) = self.index(x, y) {
            self.set_at(index, kind);
        }
    }

    /// Write a material only if the target cell is empty
    ///
    /// Returns true if the cell was written.
    pub fn place_if_empty(&mut self, x: i32, y: i32, kind: MaterialKind) -> bool {
        match self.index(x, y) {
            Some(index) if self.materials[index].is_empty() => {
                self.set_at(index, kind);
                true
            }
            _ => false,
        }
    }

    /// Index-based [`Grid::set`]. Panics on an out-of-range index.
    pub fn set_at(&mut self, index: usize, kind: MaterialKind) {
        self.materials[index] = kind;
        self.metadata[index] = self.metadata[index].on_spawn(kind);
    }

    /// Turn a cell back into empty space at ambient temperature
    pub fn reset_at(&mut self, index: usize) {
        self.materials[index] = MaterialKind::Empty;
        self.metadata[index] = CellMetadata::AMBIENT;
    }

    /// Exchange material and metadata of two cells
    ///
    /// Out-of-range indices are ignored.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a >= self.len() || b >= self.len() {
            return;
        }
        self.materials.swap(a, b);
        self.metadata.swap(a, b);
    }

    /// Reset every cell to empty at ambient temperature
    pub fn clear(&mut self) {
        self.materials.fill(MaterialKind::Empty);
        self.metadata.fill(CellMetadata::AMBIENT);
    }

    #[inline]
    pub fn kind_at(&self, index: usize) -> MaterialKind {
        self.materials[index]
    }

    #[inline]
    pub fn metadata_at(&self, index: usize) -> CellMetadata {
        self.metadata[index]
    }

    #[inline]
    pub fn metadata_at_mut(&mut self, index: usize) -> &mut CellMetadata {
        &mut self.metadata[index]
    }

    /// Read-only view of all materials, row-major
    pub fn materials(&self) -> &[MaterialKind] {
        &self.materials
    }

    /// Read-only view of all metadata, row-major
    pub fn metadata_slice(&self) -> &[CellMetadata] {
        &self.metadata
    }

    /// Temperatures of two distinct cells, mutably
    pub(crate) fn temperature_pair_mut(&mut self, a: usize, b: usize) -> (&mut f32, &mut f32) {
        debug_assert_ne!(a, b);
        if a < b {
            let (lo, hi) = self.metadata.split_at_mut(b);
            (&mut lo[a].temperature, &mut hi[0].temperature)
        } else {
            let (lo, hi) = self.metadata.split_at_mut(a);
            (&mut hi[0].temperature, &mut lo[b].temperature)
        }
    }

    /// Number of cells holding `kind`
    pub fn count(&self, kind: MaterialKind) -> usize {
        self.materials.iter().filter(|k| **k == kind).count()
    }

    /// Number of non-empty cells
    pub fn particle_count(&self) -> usize {
        self.materials.iter().filter(|k| !k.is_empty()).count()
    }
}
