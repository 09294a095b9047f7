//! JSON documents produced by the feature extractor and the shuffle step

use crate::analysis::ground_truth::{GroundTruth, ShuffleRecord};
use crate::io::error::{AlgorithmError, Result, invalid_input};
use crate::spatial::features::{BorderFeatureSet, TileCatalog, TileFeatures};
use crate::spatial::tiles::{PerBorder, PerRotation, TileId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Extracted border features of one tile
///
/// Either per-rotation features or a single unrotated set may be supplied.
/// When both are present the per-rotation features win.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRecord {
    /// Working index of the tile
    pub tile_index: TileId,
    /// Features keyed by rotation in degrees, then by border
    #[serde(default)]
    pub rotation_features: Option<PerRotation<PerBorder<BorderFeatureSet>>>,
    /// Features of the unrotated tile, keyed by border
    #[serde(default)]
    pub border_features: Option<PerBorder<BorderFeatureSet>>,
}

impl TileRecord {
    /// Convert to per-rotation tile features
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidInput`] if the record carries no features
    pub fn into_features(self) -> Result<TileFeatures> {
        match (self.rotation_features, self.border_features) {
            (Some(rotation_features), _) => Ok(TileFeatures::new(self.tile_index, rotation_features)),
            (None, Some(borders)) => Ok(TileFeatures::from_unrotated(self.tile_index, &borders)),
            (None, None) => Err(invalid_input(&format!(
                "tile {} has neither rotationFeatures nor borderFeatures",
                self.tile_index
            ))),
        }
    }
}

/// Feature document for one shuffled image
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDocument {
    /// Side length of the grid, if the extractor recorded it
    #[serde(default)]
    pub grid_size: Option<usize>,
    /// One record per tile
    pub tiles: Vec<TileRecord>,
}

impl FeatureDocument {
    /// Validate the records into a tile catalog
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidInput`] for records without features,
    /// ids that do not cover `0..N-1` or inconsistent vector shapes
    pub fn into_catalog(self) -> Result<TileCatalog> {
        let tiles = self
            .tiles
            .into_iter()
            .map(TileRecord::into_features)
            .collect::<Result<Vec<_>>>()?;
        TileCatalog::new(tiles)
    }
}

/// Shuffle document recorded when the image was cut and shuffled
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleDocument {
    /// Side length of the grid
    pub grid_size: usize,
    /// One record per tile
    pub tiles: Vec<ShuffleRecord>,
}

impl ShuffleDocument {
    /// Validate the records into ground truth
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidInput`] unless the records form a
    /// bijection over `0..grid_size²`
    pub fn into_ground_truth(self) -> Result<GroundTruth> {
        GroundTruth::new(self.grid_size, self.tiles)
    }
}

/// Read and parse a JSON document
///
/// # Errors
///
/// Returns [`AlgorithmError::FileSystem`] if the file cannot be opened and
/// [`AlgorithmError::Document`] if it is not valid for `T`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| AlgorithmError::FileSystem {
        path: path.to_path_buf(),
        operation: "open",
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| AlgorithmError::Document {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a feature document
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn load_features(path: &Path) -> Result<FeatureDocument> {
    let document: FeatureDocument = read_json(path)?;
    debug!(path = %path.display(), tiles = document.tiles.len(), "feature document loaded");
    Ok(document)
}

/// Load a shuffle document and validate it
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the records are
/// not a bijection
pub fn load_ground_truth(path: &Path) -> Result<GroundTruth> {
    let document: ShuffleDocument = read_json(path)?;
    debug!(path = %path.display(), grid_size = document.grid_size, "shuffle document loaded");
    document.into_ground_truth()
}

/// Side length of a square grid holding `tile_count` tiles
///
/// # Errors
///
/// Returns [`AlgorithmError::InvalidInput`] if `tile_count` is not a perfect square
pub fn infer_grid_size(tile_count: usize) -> Result<usize> {
    let mut side = 0_usize;
    while side * side < tile_count {
        side += 1;
    }
    if side * side == tile_count {
        Ok(side)
    } else {
        Err(invalid_input(&format!(
            "{tile_count} tiles do not form a square grid"
        )))
    }
}
