//! Ranked top-K adjacency table
//!
//! Entries are grouped by the anchoring `(tile, border)` and kept in ranking
//! order: combined score descending, then lower candidate tile, then lower
//! rotation, then lower candidate border. The ordering is total, so two builds
//! from identical inputs produce identical tables.

use crate::algorithm::scorer::ScoreBreakdown;
use crate::io::error::{AlgorithmError, Result, invalid_input, invalid_parameter};
use crate::spatial::tiles::{Border, Rotation, TileId};
use ndarray::Array2;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

/// Compatibility of one directional border pairing
///
/// An entry anchored on `(tile_a, Right)` describes `tile_b`, turned by
/// `rotation`, placed to the right of `tile_a`. The mirrored relation
/// anchored on `tile_b` is a separate entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjacencyEntry {
    /// Anchoring tile
    pub tile_a: TileId,
    /// Border of the anchoring tile
    pub border_a: Border,
    /// Candidate neighbour
    pub tile_b: TileId,
    /// Border of the candidate facing `border_a`
    pub border_b: Border,
    /// Rotation applied to the candidate
    pub rotation: Rotation,
    /// Per-modality and combined similarity
    pub scores: ScoreBreakdown,
}

impl AdjacencyEntry {
    /// Combined compatibility score
    pub const fn combined(&self) -> f64 {
        self.scores.combined
    }
}

/// Ranking order of entries sharing an anchor
///
/// Higher combined score first; ties go to the lower candidate tile, then the
/// lower rotation, then the lower candidate border.
pub fn ranking_order(a: &AdjacencyEntry, b: &AdjacencyEntry) -> Ordering {
    b.scores
        .combined
        .total_cmp(&a.scores.combined)
        .then_with(|| a.tile_b.cmp(&b.tile_b))
        .then_with(|| a.rotation.cmp(&b.rotation))
        .then_with(|| a.border_b.cmp(&b.border_b))
}

/// Ranked candidate lists per `(tile, border)`, truncated to `top_k`
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyTable {
    tile_count: usize,
    top_k: usize,
    /// Indexed by `tile * 4 + border`
    groups: Vec<Vec<AdjacencyEntry>>,
}

impl AdjacencyTable {
    /// Table over `tile_count` tiles with no entries
    pub fn empty(tile_count: usize, top_k: usize) -> Self {
        Self {
            tile_count,
            top_k,
            groups: vec![Vec::new(); tile_count * Border::ALL.len()],
        }
    }

    /// Build a table from arbitrary entries
    ///
    /// Entries are grouped by anchor, ranked and truncated to `top_k`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `top_k` is zero
    /// - an entry references a tile outside `0..tile_count`
    /// - an entry pairs a tile with itself
    pub fn from_entries(
        tile_count: usize,
        top_k: usize,
        entries: impl IntoIterator<Item = AdjacencyEntry>,
    ) -> Result<Self> {
        if top_k == 0 {
            return Err(invalid_parameter(
                "top_k",
                &top_k,
                &"at least one candidate must be kept",
            ));
        }

        let mut groups: Vec<Vec<AdjacencyEntry>> = vec![Vec::new(); tile_count * Border::ALL.len()];
        for entry in entries {
            for tile in [entry.tile_a, entry.tile_b] {
                if tile.index() >= tile_count {
                    return Err(AlgorithmError::InvalidTileIndex {
                        index: tile.index(),
                        max_tiles: tile_count,
                    });
                }
            }
            if entry.tile_a == entry.tile_b {
                return Err(invalid_input(&format!(
                    "entry pairs tile {} with itself",
                    entry.tile_a
                )));
            }
            if let Some(group) = groups.get_mut(Self::group_index(entry.tile_a, entry.border_a)) {
                group.push(entry);
            }
        }

        for group in &mut groups {
            group.sort_by(ranking_order);
            group.truncate(top_k);
        }

        Ok(Self {
            tile_count,
            top_k,
            groups,
        })
    }

    /// Assemble from groups that are already ranked and truncated, in anchor order
    pub(crate) const fn from_ranked_groups(
        tile_count: usize,
        top_k: usize,
        groups: Vec<Vec<AdjacencyEntry>>,
    ) -> Self {
        Self {
            tile_count,
            top_k,
            groups,
        }
    }

    const fn group_index(tile: TileId, border: Border) -> usize {
        tile.index() * 4 + border.index()
    }

    /// Number of tiles the table covers
    pub const fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Maximum entries kept per anchor
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    /// Ranked entries anchored on `(tile, border)`
    pub fn entries(&self, tile: TileId, border: Border) -> &[AdjacencyEntry] {
        self.groups
            .get(Self::group_index(tile, border))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Best-ranked entry placing `candidate` against `border` of `tile`
    ///
    /// Only entries whose candidate border is the one physically touching
    /// `border` are considered.
    pub fn best_match(&self, tile: TileId, border: Border, candidate: TileId) -> Option<&AdjacencyEntry> {
        let facing = border.opposite();
        self.entries(tile, border)
            .iter()
            .find(|entry| entry.tile_b == candidate && entry.border_b == facing)
    }

    /// Entry for an exact pairing, if it survived truncation
    pub fn find(
        &self,
        tile_a: TileId,
        border_a: Border,
        tile_b: TileId,
        border_b: Border,
        rotation: Rotation,
    ) -> Option<&AdjacencyEntry> {
        self.entries(tile_a, border_a).iter().find(|entry| {
            entry.tile_b == tile_b && entry.border_b == border_b && entry.rotation == rotation
        })
    }

    /// Every entry, grouped by anchor in `(tile, border)` order
    pub fn iter(&self) -> impl Iterator<Item = &AdjacencyEntry> {
        self.groups.iter().flatten()
    }

    /// Total number of entries kept
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Whether no entries were kept
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }

    /// Top entry of every non-empty anchor
    pub fn best_matches(&self) -> Vec<&AdjacencyEntry> {
        self.groups.iter().filter_map(|group| group.first()).collect()
    }

    /// Mean combined score of the kept entries between each ordered tile pair
    ///
    /// Cell `[i, j]` averages every entry anchored on tile `i` with candidate
    /// `j`. Pairs with no kept entries are zero; the diagonal is NaN.
    pub fn pair_heatmap(&self) -> Array2<f64> {
        let n = self.tile_count;
        let mut sums = Array2::<f64>::zeros((n, n));
        let mut counts = Array2::<usize>::zeros((n, n));

        for entry in self.iter() {
            let cell = [entry.tile_a.index(), entry.tile_b.index()];
            if let Some(sum) = sums.get_mut(cell) {
                *sum += entry.combined();
            }
            if let Some(count) = counts.get_mut(cell) {
                *count += 1;
            }
        }

        let mut heatmap = Array2::<f64>::zeros((n, n));
        for ((i, j), value) in heatmap.indexed_iter_mut() {
            let count = counts.get([i, j]).copied().unwrap_or(0);
            *value = if i == j {
                f64::NAN
            } else if count > 0 {
                sums.get([i, j]).copied().unwrap_or(0.0) / count as f64
            } else {
                0.0
            };
        }
        heatmap
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TableView<'a> {
    tile_count: usize,
    top_k: usize,
    entries: Vec<&'a AdjacencyEntry>,
}

impl Serialize for AdjacencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        TableView {
            tile_count: self.tile_count,
            top_k: self.top_k,
            entries: self.iter().collect(),
        }
        .serialize(serializer)
    }
}
