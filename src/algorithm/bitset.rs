use crate::spatial::tiles::TileId;
use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset recording which tiles have been placed
///
/// Indexed directly by [`TileId`]. Ids outside the capacity are never
/// members and are ignored on insertion.
#[derive(Clone, Debug)]
pub struct TileBitset {
    bits: BitVec,
}

impl TileBitset {
    /// Create a bitset with no tiles present
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: bitvec![0; capacity],
        }
    }

    /// Number of tile ids the set can hold
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Mark a tile as present
    pub fn insert(&mut self, tile: TileId) {
        if tile.index() < self.bits.len() {
            self.bits.set(tile.index(), true);
        }
    }

    /// Test tile membership
    pub fn contains(&self, tile: TileId) -> bool {
        self.bits.get(tile.index()).as_deref() == Some(&true)
    }

    /// Count tiles in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Whether every id up to the capacity is present
    pub fn is_full(&self) -> bool {
        self.bits.all()
    }

    /// Tiles not in the set, in ascending id order
    pub fn absent(&self) -> impl Iterator<Item = TileId> + '_ {
        self.bits.iter_zeros().map(TileId)
    }

    /// Tiles in the set, in ascending id order
    pub fn to_vec(&self) -> Vec<TileId> {
        self.bits.iter_ones().map(TileId).collect()
    }
}

impl fmt::Display for TileBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileBitset({}/{} tiles)", self.count(), self.capacity())
    }
}
