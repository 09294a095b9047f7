//! Greedy row-major placement driven by the top-K table
//!
//! The seed tile goes to the top-left corner unrotated. Each sweep visits
//! empty cells in row-major order and fills a cell with the unused tile whose
//! average best score against the already placed neighbours is highest,
//! provided that average clears the acceptance threshold. Tiles placed earlier
//! in a sweep count as neighbours for later cells of the same sweep. Sweeps
//! repeat until one places nothing or every tile is used.

use crate::algorithm::bitset::TileBitset;
use crate::algorithm::rotation::{FirstNeighbor, RotationPolicy};
use crate::algorithm::table::AdjacencyTable;
use crate::io::configuration::GREEDY_ACCEPTANCE_THRESHOLD;
use crate::io::error::{AlgorithmError, Result, invalid_input, invalid_parameter};
use crate::spatial::grid::{Grid, PlacedTile};
use crate::spatial::tiles::{Border, Rotation, TileId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Greedy solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreedyConfig {
    /// Average score a candidate must strictly exceed to be placed
    pub acceptance_threshold: f64,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: GREEDY_ACCEPTANCE_THRESHOLD,
        }
    }
}

impl GreedyConfig {
    /// Check the threshold is a finite number
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidParameter`] for a NaN or infinite threshold
    pub fn validate(&self) -> Result<()> {
        if !self.acceptance_threshold.is_finite() {
            return Err(invalid_parameter(
                "acceptance_threshold",
                &self.acceptance_threshold,
                &"threshold must be finite",
            ));
        }
        Ok(())
    }
}

/// A placed tile next to an empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// Tile occupying the neighbouring cell
    pub tile: TileId,
    /// Border of that tile facing the empty cell
    pub border: Border,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    tile: TileId,
    average: f64,
}

/// Deterministic greedy reconstruction
#[derive(Debug, Clone)]
pub struct GreedySolver<P = FirstNeighbor> {
    config: GreedyConfig,
    policy: P,
}

impl GreedySolver {
    /// Solver using [`FirstNeighbor`] rotation choice
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn new(config: GreedyConfig) -> Result<Self> {
        Self::with_policy(config, FirstNeighbor)
    }
}

impl<P: RotationPolicy> GreedySolver<P> {
    /// Solver with a custom rotation policy
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn with_policy(config: GreedyConfig, policy: P) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, policy })
    }

    /// Active configuration
    pub const fn config(&self) -> &GreedyConfig {
        &self.config
    }

    /// Assemble a grid starting from `seed_tile` at `(0, 0)`
    ///
    /// Cells with no acceptable candidate stay empty.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `total_tiles` is zero or differs from `grid_size²`
    /// - the table covers a different number of tiles
    /// - `seed_tile` is outside `0..total_tiles`
    pub fn solve(
        &self,
        table: &AdjacencyTable,
        grid_size: usize,
        total_tiles: usize,
        seed_tile: TileId,
    ) -> Result<Grid> {
        validate_dimensions(grid_size, total_tiles)?;
        if table.tile_count() != total_tiles {
            return Err(invalid_input(&format!(
                "adjacency table covers {} tiles, grid needs {total_tiles}",
                table.tile_count()
            )));
        }
        if seed_tile.index() >= total_tiles {
            return Err(AlgorithmError::InvalidTileIndex {
                index: seed_tile.index(),
                max_tiles: total_tiles,
            });
        }

        let mut grid = Grid::new(grid_size);
        let mut used = TileBitset::new(total_tiles);
        grid.place(0, 0, PlacedTile::new(seed_tile, Rotation::R0));
        used.insert(seed_tile);

        let mut sweeps = 0_usize;
        let mut changed = true;
        while changed && !used.is_full() {
            changed = false;
            sweeps += 1;
            let mut placed = 0_usize;

            for row in 0..grid_size {
                for col in 0..grid_size {
                    if grid.get(row, col).is_some() {
                        continue;
                    }
                    let neighbors = placed_neighbors(&grid, row, col);
                    if neighbors.is_empty() {
                        continue;
                    }

                    let Some(best) = best_candidate(table, &used, &neighbors) else {
                        continue;
                    };
                    if best.average > self.config.acceptance_threshold {
                        let rotation = self.policy.rotation(table, best.tile, &neighbors);
                        grid.place(row, col, PlacedTile::new(best.tile, rotation));
                        used.insert(best.tile);
                        changed = true;
                        placed += 1;
                    }
                }
            }

            debug!(sweep = sweeps, placed, used = used.count(), "greedy sweep finished");
        }

        info!(
            placed = grid.placed_count(),
            total = total_tiles,
            sweeps,
            "greedy placement finished"
        );
        Ok(grid)
    }
}

/// Reject grids that cannot hold exactly `total_tiles` tiles
pub(crate) fn validate_dimensions(grid_size: usize, total_tiles: usize) -> Result<()> {
    if total_tiles == 0 {
        return Err(invalid_input(&"no tiles to place"));
    }
    if grid_size.checked_mul(grid_size) != Some(total_tiles) {
        return Err(invalid_input(&format!(
            "a {grid_size}x{grid_size} grid cannot hold {total_tiles} tiles"
        )));
    }
    Ok(())
}

/// Placed neighbours of a cell in the order top, left, right, bottom
pub fn placed_neighbors(grid: &Grid, row: usize, col: usize) -> Vec<Neighbor> {
    let positions = [
        (row.checked_sub(1).map(|r| (r, col)), Border::Bottom),
        (col.checked_sub(1).map(|c| (row, c)), Border::Right),
        (Some((row, col + 1)), Border::Left),
        (Some((row + 1, col)), Border::Top),
    ];

    positions
        .into_iter()
        .filter_map(|(position, border)| {
            let (r, c) = position?;
            grid.get(r, c).map(|placed| Neighbor {
                tile: placed.tile,
                border,
            })
        })
        .collect()
}

/// Unused tile with the strictly highest average over the neighbours that have an entry for it
///
/// Candidates are visited in ascending id order, so ties keep the lowest id.
/// A candidate with no entries averages zero.
fn best_candidate(table: &AdjacencyTable, used: &TileBitset, neighbors: &[Neighbor]) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let mut best_average = -1.0;

    for tile in used.absent() {
        let (sum, found) = neighbors
            .iter()
            .filter_map(|neighbor| table.best_match(neighbor.tile, neighbor.border, tile))
            .fold((0.0, 0_usize), |(sum, found), entry| (sum + entry.combined(), found + 1));
        let average = if found > 0 { sum / found as f64 } else { 0.0 };

        if average > best_average {
            best_average = average;
            best = Some(Candidate { tile, average });
        }
    }

    best
}
