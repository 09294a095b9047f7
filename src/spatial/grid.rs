//! Square reconstruction grid
//!
//! Cells are either empty or hold a [`PlacedTile`]. A tile id may occupy at
//! most one cell; solvers uphold this and debug builds assert it on every
//! placement.

use crate::io::error::{Result, invalid_input};
use crate::spatial::tiles::{Rotation, TileId};
use ndarray::Array2;
use serde::{Serialize, Serializer};

/// A tile placed in a grid cell with the rotation it is shown at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedTile {
    /// Working index of the placed tile
    #[serde(rename = "tileIndex")]
    pub tile: TileId,
    /// Clockwise rotation applied to the tile
    pub rotation: Rotation,
}

impl PlacedTile {
    /// Tile shown at `rotation`
    pub const fn new(tile: TileId, rotation: Rotation) -> Self {
        Self { tile, rotation }
    }
}

/// `grid_size × grid_size` arrangement of tiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Array2<Option<PlacedTile>>,
}

impl Grid {
    /// Empty grid
    pub fn new(size: usize) -> Self {
        Self {
            cells: Array2::from_elem((size, size), None),
        }
    }

    /// Grid from cells listed row by row
    ///
    /// # Errors
    ///
    /// Returns [`crate::AlgorithmError::InvalidInput`] if `cells` does not hold
    /// exactly `size²` entries or places a tile twice
    pub fn from_row_major(size: usize, cells: Vec<Option<PlacedTile>>) -> Result<Self> {
        let count = cells.len();
        let cells = Array2::from_shape_vec((size, size), cells).map_err(|_shape_error| {
            invalid_input(&format!(
                "expected {} cells for a {size}x{size} grid, got {count}",
                size * size
            ))
        })?;
        let grid = Self { cells };
        if !grid.has_unique_tiles() {
            return Err(invalid_input(&"grid places the same tile more than once"));
        }
        Ok(grid)
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Content of a cell; `None` for empty or out-of-range cells
    pub fn get(&self, row: usize, col: usize) -> Option<PlacedTile> {
        self.cells.get([row, col]).copied().flatten()
    }

    /// Put a tile into a cell
    ///
    /// Placing a tile that is already on the grid breaks the uniqueness
    /// invariant; debug builds assert against it.
    pub fn place(&mut self, row: usize, col: usize, placed: PlacedTile) {
        debug_assert!(
            !self.contains(placed.tile),
            "tile {} is already on the grid",
            placed.tile
        );
        if let Some(cell) = self.cells.get_mut([row, col]) {
            *cell = Some(placed);
        }
    }

    /// Exchange the contents of two cells
    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) {
        let first = self.get(a.0, a.1);
        let second = self.get(b.0, b.1);
        if let Some(cell) = self.cells.get_mut([a.0, a.1]) {
            *cell = second;
        }
        if let Some(cell) = self.cells.get_mut([b.0, b.1]) {
            *cell = first;
        }
    }

    /// Change the rotation of an occupied cell
    pub fn set_rotation(&mut self, row: usize, col: usize, rotation: Rotation) {
        if let Some(Some(placed)) = self.cells.get_mut([row, col]) {
            placed.rotation = rotation;
        }
    }

    /// Occupied cells as `(row, col, tile)` in row-major order
    pub fn placed(&self) -> impl Iterator<Item = (usize, usize, PlacedTile)> + '_ {
        self.cells
            .indexed_iter()
            .filter_map(|((row, col), cell)| cell.map(|placed| (row, col, placed)))
    }

    /// Number of occupied cells
    pub fn placed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_none())
            .map(|(position, _)| position)
            .collect()
    }

    /// Whether every cell is occupied
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Whether a tile is on the grid
    pub fn contains(&self, tile: TileId) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.is_some_and(|placed| placed.tile == tile))
    }

    /// Whether no tile occupies two cells
    pub fn has_unique_tiles(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.placed().all(|(_, _, placed)| seen.insert(placed.tile))
    }

    /// Cells as nested rows, for reporting
    pub fn to_rows(&self) -> Vec<Vec<Option<PlacedTile>>> {
        self.cells.rows().into_iter().map(|row| row.to_vec()).collect()
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}
