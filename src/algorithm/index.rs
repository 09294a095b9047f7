//! Dense score index and the lookup seam shared by the solvers
//!
//! The top-K table answers "who fits best here", but annealing needs the
//! score of arbitrary pairings, most of which fall outside any top-K list.
//! [`ScoreIndex`] keeps every computed combined score in a dense array so
//! those lookups stay O(1). Slots the engine never scored hold NaN.

use crate::algorithm::table::AdjacencyTable;
use crate::spatial::tiles::{Border, Rotation, TileId};
use ndarray::{Array2, Array3, Array4, Axis};

/// Combined score of an exact directional pairing
pub trait CompatibilityLookup {
    /// Number of tiles covered
    fn tile_count(&self) -> usize;

    /// Score of `border_b` of `tile_b` (turned by `rotation`) against
    /// `border_a` of the unrotated `tile_a`, if one is known
    fn compatibility(
        &self,
        tile_a: TileId,
        border_a: Border,
        tile_b: TileId,
        border_b: Border,
        rotation: Rotation,
    ) -> Option<f64>;
}

/// Every combined score computed by one adjacency build
///
/// Axes: anchor group `tile_a * 4 + border_a`, candidate tile, candidate
/// border, rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreIndex {
    scores: Array4<f64>,
}

impl ScoreIndex {
    /// Index over `tile_count` tiles with nothing scored
    pub fn unscored(tile_count: usize) -> Self {
        Self {
            scores: Array4::from_elem(
                (tile_count * Border::ALL.len(), tile_count, Border::ALL.len(), Rotation::ALL.len()),
                f64::NAN,
            ),
        }
    }

    /// Copy one anchor group's `(tile_b, border_b, rotation)` scores into place
    pub(crate) fn assign_group(&mut self, group: usize, slab: &Array3<f64>) {
        if group < self.scores.len_of(Axis(0)) {
            self.scores.index_axis_mut(Axis(0), group).assign(slab);
        }
    }

    /// Number of tiles covered
    pub fn tile_count(&self) -> usize {
        self.scores.len_of(Axis(1))
    }

    /// Score of an exact pairing; `None` if it was never computed
    pub fn score(
        &self,
        tile_a: TileId,
        border_a: Border,
        tile_b: TileId,
        border_b: Border,
        rotation: Rotation,
    ) -> Option<f64> {
        let group = tile_a.index() * 4 + border_a.index();
        self.scores
            .get([group, tile_b.index(), border_b.index(), rotation.quarter_turns()])
            .copied()
            .filter(|score| !score.is_nan())
    }

    /// Number of scored slots
    pub fn scored_count(&self) -> usize {
        self.scores.iter().filter(|score| !score.is_nan()).count()
    }

    /// Tile-by-tile matrix for one border pairing
    ///
    /// Cell `[i, j]` is the score of `border_a` of tile `i` against the
    /// opposite border of tile `j` turned by `rotation`. Unscored pairs and the
    /// diagonal are NaN.
    pub fn border_matrix(&self, border_a: Border, rotation: Rotation) -> Array2<f64> {
        let n = self.tile_count();
        let border_b = border_a.opposite();
        Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                return f64::NAN;
            }
            self.score(TileId(i), border_a, TileId(j), border_b, rotation)
                .unwrap_or(f64::NAN)
        })
    }
}

impl CompatibilityLookup for ScoreIndex {
    fn tile_count(&self) -> usize {
        Self::tile_count(self)
    }

    fn compatibility(
        &self,
        tile_a: TileId,
        border_a: Border,
        tile_b: TileId,
        border_b: Border,
        rotation: Rotation,
    ) -> Option<f64> {
        self.score(tile_a, border_a, tile_b, border_b, rotation)
    }
}

impl CompatibilityLookup for AdjacencyTable {
    fn tile_count(&self) -> usize {
        Self::tile_count(self)
    }

    fn compatibility(
        &self,
        tile_a: TileId,
        border_a: Border,
        tile_b: TileId,
        border_b: Border,
        rotation: Rotation,
    ) -> Option<f64> {
        self.find(tile_a, border_a, tile_b, border_b, rotation)
            .map(|entry| entry.combined())
    }
}
