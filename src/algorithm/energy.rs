//! Grid energy: negated compatibility summed over adjacent filled cells
//!
//! Each horizontal pair contributes the score of the left tile's right border
//! against the right tile's left border at the right tile's rotation; each
//! vertical pair does the same with bottom and top. A pair the lookup has no
//! score for costs [`UNMATCHED_PAIR_PENALTY`]. Lower is better.

use crate::algorithm::index::CompatibilityLookup;
use crate::io::configuration::UNMATCHED_PAIR_PENALTY;
use crate::spatial::grid::{Grid, PlacedTile};
use crate::spatial::tiles::Border;

/// Edge between a cell and its right or bottom neighbour
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Edge {
    row: usize,
    col: usize,
    border: Border,
}

impl Edge {
    const fn far_cell(self) -> (usize, usize) {
        match self.border {
            Border::Bottom => (self.row + 1, self.col),
            _ => (self.row, self.col + 1),
        }
    }
}

/// Energy of one adjacent pair where `far` sits across `border` of `near`
pub fn pair_energy<L>(lookup: &L, near: PlacedTile, border: Border, far: PlacedTile) -> f64
where
    L: CompatibilityLookup + ?Sized,
{
    lookup
        .compatibility(near.tile, border, far.tile, border.opposite(), far.rotation)
        .map_or(UNMATCHED_PAIR_PENALTY, |score| -score)
}

fn edge_energy<L>(grid: &Grid, lookup: &L, edge: Edge) -> f64
where
    L: CompatibilityLookup + ?Sized,
{
    let (far_row, far_col) = edge.far_cell();
    match (grid.get(edge.row, edge.col), grid.get(far_row, far_col)) {
        (Some(near), Some(far)) => pair_energy(lookup, near, edge.border, far),
        _ => 0.0,
    }
}

/// Total energy of a grid
pub fn grid_energy<L>(grid: &Grid, lookup: &L) -> f64
where
    L: CompatibilityLookup + ?Sized,
{
    grid.placed()
        .map(|(row, col, near)| {
            [Border::Right, Border::Bottom]
                .into_iter()
                .filter_map(|border| {
                    let (far_row, far_col) = Edge { row, col, border }.far_cell();
                    grid.get(far_row, far_col)
                        .map(|far| pair_energy(lookup, near, border, far))
                })
                .sum::<f64>()
        })
        .sum()
}

/// Energy of the edges touching any of `cells`, each edge counted once
///
/// The difference of this value before and after a move that only changes
/// `cells` equals the difference in [`grid_energy`].
pub fn local_energy<L>(grid: &Grid, lookup: &L, cells: &[(usize, usize)]) -> f64
where
    L: CompatibilityLookup + ?Sized,
{
    let mut edges = Vec::with_capacity(cells.len() * 4);
    for &(row, col) in cells {
        edges.push(Edge {
            row,
            col,
            border: Border::Right,
        });
        edges.push(Edge {
            row,
            col,
            border: Border::Bottom,
        });
        if let Some(left) = col.checked_sub(1) {
            edges.push(Edge {
                row,
                col: left,
                border: Border::Right,
            });
        }
        if let Some(above) = row.checked_sub(1) {
            edges.push(Edge {
                row: above,
                col,
                border: Border::Bottom,
            });
        }
    }
    edges.sort_unstable();
    edges.dedup();

    edges
        .into_iter()
        .map(|edge| edge_energy(grid, lookup, edge))
        .sum()
}
