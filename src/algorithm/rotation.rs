//! Rotation choice for a tile the greedy solver is about to place

use crate::algorithm::greedy::Neighbor;
use crate::algorithm::table::AdjacencyTable;
use crate::spatial::tiles::{Rotation, TileId};
use std::fmt::Debug;

/// Picks the rotation of a chosen candidate from its neighbours' table entries
pub trait RotationPolicy: Debug {
    /// Rotation for `candidate`, given the placed neighbours in gathering order
    /// (top, left, right, bottom)
    fn rotation(&self, table: &AdjacencyTable, candidate: TileId, neighbors: &[Neighbor]) -> Rotation;
}

/// Rotation of the best entry against the first neighbour; `R0` if that
/// neighbour has no entry for the candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstNeighbor;

impl RotationPolicy for FirstNeighbor {
    fn rotation(&self, table: &AdjacencyTable, candidate: TileId, neighbors: &[Neighbor]) -> Rotation {
        neighbors
            .first()
            .and_then(|neighbor| table.best_match(neighbor.tile, neighbor.border, candidate))
            .map_or(Rotation::R0, |entry| entry.rotation)
    }
}

/// Rotation of the highest-scoring entry across all neighbours
///
/// Ties keep the earlier neighbour. Falls back to `R0` when no neighbour has
/// an entry for the candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrongestNeighbor;

impl RotationPolicy for StrongestNeighbor {
    fn rotation(&self, table: &AdjacencyTable, candidate: TileId, neighbors: &[Neighbor]) -> Rotation {
        neighbors
            .iter()
            .filter_map(|neighbor| table.best_match(neighbor.tile, neighbor.border, candidate))
            .fold(None, |best: Option<(f64, Rotation)>, entry| match best {
                Some((score, _)) if score >= entry.combined() => best,
                _ => Some((entry.combined(), entry.rotation)),
            })
            .map_or(Rotation::R0, |(_, rotation)| rotation)
    }
}
