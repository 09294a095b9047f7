//! Per-border feature vectors supplied by the external extractor
//!
//! Every tile carries one [`BorderFeatureSet`] for each of its four borders
//! under each of the four rotations. The core never computes these values; it
//! only checks that they agree in shape across tiles before scoring.

use crate::io::error::{Result, invalid_input};
use crate::spatial::tiles::{Border, PerBorder, PerRotation, Rotation, TileId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feature vectors describing one border strip of one (possibly rotated) tile
///
/// Any modality may be absent when extraction failed; scoring then treats
/// that modality as dissimilar instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderFeatureSet {
    /// Normalized colour histogram (sums to roughly one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_histogram: Option<Vec<f64>>,
    /// Fixed-length texture statistics (e.g. Gabor mean, std and energy per filter)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_stats: Option<Vec<f64>>,
    /// Deep-feature vectors keyed by network layer name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub deep_stats: BTreeMap<String, Vec<f64>>,
}

impl BorderFeatureSet {
    /// Feature set with colour and texture vectors and no deep features
    pub const fn new(color_histogram: Vec<f64>, texture_stats: Vec<f64>) -> Self {
        Self {
            color_histogram: Some(color_histogram),
            texture_stats: Some(texture_stats),
            deep_stats: BTreeMap::new(),
        }
    }

    /// Add a deep-feature vector for `layer`
    #[must_use]
    pub fn with_deep_layer(mut self, layer: impl Into<String>, vector: Vec<f64>) -> Self {
        self.deep_stats.insert(layer.into(), vector);
        self
    }

    /// Colour histogram, if extracted
    pub fn color(&self) -> Option<&[f64]> {
        self.color_histogram.as_deref()
    }

    /// Texture statistics, if extracted
    pub fn texture(&self) -> Option<&[f64]> {
        self.texture_stats.as_deref()
    }

    /// Deep-feature vector for a layer, if extracted
    pub fn deep_layer(&self, layer: &str) -> Option<&[f64]> {
        self.deep_stats.get(layer).map(Vec::as_slice)
    }
}

/// All border features of one tile, for every rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileFeatures {
    /// Working index of the tile
    #[serde(rename = "tileIndex")]
    pub tile: TileId,
    /// Border features indexed by rotation then border
    pub rotation_features: PerRotation<PerBorder<BorderFeatureSet>>,
}

impl TileFeatures {
    /// Tile with explicit per-rotation features
    pub const fn new(tile: TileId, rotation_features: PerRotation<PerBorder<BorderFeatureSet>>) -> Self {
        Self {
            tile,
            rotation_features,
        }
    }

    /// Expand unrotated border features to all four rotations
    ///
    /// Each rotated view reuses the features of the border that physically
    /// moves into place, so strip statistics are carried over unchanged. This
    /// is exact for orientation-free descriptors such as colour histograms and
    /// an approximation for directional texture statistics.
    pub fn from_unrotated(tile: TileId, borders: &PerBorder<BorderFeatureSet>) -> Self {
        let rotation_features = PerRotation::from_fn(|rotation| {
            PerBorder::from_fn(|border| borders.get(border.rotated_source(rotation)).clone())
        });
        Self {
            tile,
            rotation_features,
        }
    }

    /// Features of `border` once the tile is rotated by `rotation`
    pub const fn border(&self, rotation: Rotation, border: Border) -> &BorderFeatureSet {
        self.rotation_features.get(rotation).get(border)
    }

    /// Iterate every `(rotation, border, features)` slot
    pub fn slots(&self) -> impl Iterator<Item = (Rotation, Border, &BorderFeatureSet)> {
        self.rotation_features.iter().flat_map(|(rotation, borders)| {
            borders
                .iter()
                .map(move |(border, features)| (rotation, border, features))
        })
    }
}

/// Vector length per modality shared by every tile in a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureShape {
    /// Colour histogram bin count
    pub color: Option<usize>,
    /// Texture statistic vector length
    pub texture: Option<usize>,
    /// Deep-feature vector length per layer
    pub deep: BTreeMap<String, usize>,
}

impl FeatureShape {
    fn observe(
        expected: &mut Option<usize>,
        actual: usize,
        modality: &str,
        tile: TileId,
        rotation: Rotation,
        border: Border,
    ) -> Result<()> {
        match *expected {
            None => {
                *expected = Some(actual);
                Ok(())
            }
            Some(length) if length == actual => Ok(()),
            Some(length) => Err(invalid_input(&format!(
                "{modality} vector of tile {tile} ({border}, {rotation}) has length {actual}, expected {length}"
            ))),
        }
    }
}

/// Source of border features for the adjacency engine
pub trait FeatureLookup {
    /// Number of tiles; ids run from `0` to `tile_count() - 1`
    fn tile_count(&self) -> usize;

    /// Features of `border` of `tile` rotated by `rotation`
    ///
    /// `None` means nothing was extracted for that slot; every modality then
    /// scores zero.
    fn border_features(
        &self,
        tile: TileId,
        rotation: Rotation,
        border: Border,
    ) -> Option<&BorderFeatureSet>;
}

/// Validated collection of tile features
///
/// Tile ids are exactly `0..N-1` and every present vector of a modality has
/// the same length across all tiles, borders and rotations.
#[derive(Debug, Clone, Default)]
pub struct TileCatalog {
    tiles: Vec<TileFeatures>,
    shape: FeatureShape,
}

impl TileCatalog {
    /// Validate and index a set of tile features
    ///
    /// # Errors
    ///
    /// Returns [`crate::AlgorithmError::InvalidInput`] if:
    /// - tile ids are duplicated or do not cover `0..N-1`
    /// - any modality has vectors of differing length
    pub fn new(mut tiles: Vec<TileFeatures>) -> Result<Self> {
        tiles.sort_by_key(|features| features.tile);

        for (expected, features) in tiles.iter().enumerate() {
            if features.tile.index() != expected {
                return Err(invalid_input(&format!(
                    "tile ids must be exactly 0..{}, found {} at position {expected}",
                    tiles.len(),
                    features.tile
                )));
            }
        }

        let mut shape = FeatureShape::default();
        for features in &tiles {
            for (rotation, border, set) in features.slots() {
                let tile = features.tile;
                if let Some(color) = set.color() {
                    FeatureShape::observe(&mut shape.color, color.len(), "colour", tile, rotation, border)?;
                }
                if let Some(texture) = set.texture() {
                    FeatureShape::observe(
                        &mut shape.texture,
                        texture.len(),
                        "texture",
                        tile,
                        rotation,
                        border,
                    )?;
                }
                for (layer, vector) in &set.deep_stats {
                    let expected = shape.deep.entry(layer.clone()).or_insert(vector.len());
                    if *expected != vector.len() {
                        return Err(invalid_input(&format!(
                            "deep layer '{layer}' of tile {tile} ({border}, {rotation}) has length {}, expected {expected}",
                            vector.len()
                        )));
                    }
                }
            }
        }

        Ok(Self { tiles, shape })
    }

    /// Number of tiles
    pub const fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the catalog holds no tiles
    pub const fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Shared vector shape
    pub const fn shape(&self) -> &FeatureShape {
        &self.shape
    }

    /// Features of one tile
    pub fn tile(&self, tile: TileId) -> Option<&TileFeatures> {
        self.tiles.get(tile.index())
    }

    /// All tiles in id order
    pub fn tiles(&self) -> &[TileFeatures] {
        &self.tiles
    }
}

impl FeatureLookup for TileCatalog {
    fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    fn border_features(
        &self,
        tile: TileId,
        rotation: Rotation,
        border: Border,
    ) -> Option<&BorderFeatureSet> {
        self.tile(tile).map(|features| features.border(rotation, border))
    }
}
