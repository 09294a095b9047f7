//! Accuracy of a reconstructed grid against the recorded shuffle

use crate::analysis::ground_truth::GroundTruth;
use crate::io::error::{Result, invalid_input};
use crate::spatial::grid::Grid;
use crate::spatial::tiles::SourceIndex;
use serde::Serialize;

/// Position and rotation accuracy of one grid
///
/// Percentages are relative to every cell of the grid, so empty cells count
/// as wrong.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyReport {
    /// Share of cells holding the tile that originally sat there, in percent
    pub position_accuracy: f64,
    /// Share of cells that are position-correct and upright, in percent
    pub rotation_accuracy: f64,
    /// Cells holding the right tile
    pub correct_positions: usize,
    /// Cells holding the right tile at the right rotation
    pub correct_rotations: usize,
    /// Cells in the grid
    pub total_tiles: usize,
}

/// Compare a grid with the ground truth
///
/// A filled cell `(row, col)` is position-correct when its tile's source index
/// is `row * grid_size + col`, and rotation-correct when it is also shown at
/// the tile's original rotation.
///
/// # Errors
///
/// Returns [`crate::AlgorithmError::InvalidInput`] if the grid and the ground
/// truth disagree on the grid size
pub fn evaluate(grid: &Grid, truth: &GroundTruth) -> Result<AccuracyReport> {
    let grid_size = grid.size();
    if grid_size != truth.grid_size() {
        return Err(invalid_input(&format!(
            "grid is {grid_size}x{grid_size} but the shuffle was recorded for {0}x{0}",
            truth.grid_size()
        )));
    }

    let mut correct_positions = 0_usize;
    let mut correct_rotations = 0_usize;
    for (row, col, placed) in grid.placed() {
        if truth.source_of(placed.tile) != Some(SourceIndex::from_cell(row, col, grid_size)) {
            continue;
        }
        correct_positions += 1;
        if truth.original_rotation(placed.tile) == Some(placed.rotation) {
            correct_rotations += 1;
        }
    }

    let total_tiles = grid.cell_count();
    let percent = |count: usize| {
        if total_tiles == 0 {
            0.0
        } else {
            count as f64 / total_tiles as f64 * 100.0
        }
    };

    Ok(AccuracyReport {
        position_accuracy: percent(correct_positions),
        rotation_accuracy: percent(correct_rotations),
        correct_positions,
        correct_rotations,
        total_tiles,
    })
}
