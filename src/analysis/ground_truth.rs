//! Record of how the original image was shuffled
//!
//! Solvers only ever see [`TileId`]s. The ground truth is the one place that
//! knows which original position each working tile came from, and is read
//! only by the accuracy evaluator.

use crate::io::error::{Result, invalid_input};
use crate::spatial::tiles::{Rotation, SourceIndex, TileId};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Where one tile came from and where the shuffle put it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleRecord {
    /// Original position in the unshuffled image
    pub source_index: SourceIndex,
    /// Position in the shuffled grid, used as the working tile id
    pub dest_position: TileId,
    /// Rotation applied by the shuffle
    #[serde(default, alias = "shuffleRotation")]
    pub rotation: Rotation,
}

/// Validated bijection between working tile ids and source positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundTruth {
    grid_size: usize,
    /// Indexed by working tile id
    tiles: Vec<ShuffleRecord>,
}

impl GroundTruth {
    /// Validate shuffle records for a `grid_size × grid_size` grid
    ///
    /// # Errors
    ///
    /// Returns [`crate::AlgorithmError::InvalidInput`] unless there are exactly
    /// `grid_size²` records whose destinations and sources each cover
    /// `0..grid_size²` once
    pub fn new(grid_size: usize, records: Vec<ShuffleRecord>) -> Result<Self> {
        let total = grid_size * grid_size;
        if records.len() != total {
            return Err(invalid_input(&format!(
                "{} shuffle records for a {grid_size}x{grid_size} grid",
                records.len()
            )));
        }

        let mut tiles: Vec<Option<ShuffleRecord>> = vec![None; total];
        let mut sources_seen = vec![false; total];
        for record in records {
            let slot = tiles.get_mut(record.dest_position.index()).ok_or_else(|| {
                invalid_input(&format!(
                    "destination {} is outside the grid",
                    record.dest_position
                ))
            })?;
            if slot.is_some() {
                return Err(invalid_input(&format!(
                    "destination {} appears more than once",
                    record.dest_position
                )));
            }
            *slot = Some(record);

            let seen = sources_seen
                .get_mut(record.source_index.index())
                .ok_or_else(|| {
                    invalid_input(&format!(
                        "source index {} is outside the grid",
                        record.source_index.index()
                    ))
                })?;
            if *seen {
                return Err(invalid_input(&format!(
                    "source index {} appears more than once",
                    record.source_index.index()
                )));
            }
            *seen = true;
        }

        // Equal counts and no duplicates make both sides complete
        Ok(Self {
            grid_size,
            tiles: tiles.into_iter().flatten().collect(),
        })
    }

    /// Unshuffled arrangement: every tile already in place, unrotated
    pub fn identity(grid_size: usize) -> Self {
        let tiles = (0..grid_size * grid_size)
            .map(|index| ShuffleRecord {
                source_index: SourceIndex(index),
                dest_position: TileId(index),
                rotation: Rotation::R0,
            })
            .collect();
        Self { grid_size, tiles }
    }

    /// Random permutation with a uniformly random shuffle rotation per tile
    pub fn shuffled<R: Rng + ?Sized>(grid_size: usize, rng: &mut R) -> Self {
        let mut sources: Vec<usize> = (0..grid_size * grid_size).collect();
        sources.shuffle(rng);

        let tiles = sources
            .into_iter()
            .enumerate()
            .map(|(dest, source)| ShuffleRecord {
                source_index: SourceIndex(source),
                dest_position: TileId(dest),
                rotation: Rotation::from_quarter_turns(rng.random_range(0..4)),
            })
            .collect();
        Self { grid_size, tiles }
    }

    /// Side length of the grid
    pub const fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Number of tiles
    pub const fn total_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Original position of a working tile
    pub fn source_of(&self, tile: TileId) -> Option<SourceIndex> {
        self.tiles.get(tile.index()).map(|record| record.source_index)
    }

    /// Rotation the shuffle applied to a working tile
    pub fn shuffle_rotation(&self, tile: TileId) -> Option<Rotation> {
        self.tiles.get(tile.index()).map(|record| record.rotation)
    }

    /// Rotation a tile has in the original image
    ///
    /// Source tiles are cut from an upright image, so every known tile is `R0`.
    pub fn original_rotation(&self, tile: TileId) -> Option<Rotation> {
        self.tiles.get(tile.index()).map(|_| Rotation::R0)
    }

    /// Records in working tile id order
    pub fn records(&self) -> &[ShuffleRecord] {
        &self.tiles
    }
}
