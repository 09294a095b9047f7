//! Spatial data structures for tile reconstruction
//!
//! This module contains:
//! - Tile identifiers, borders and rotations
//! - Per-border feature vectors from the external extractor
//! - The square reconstruction grid

/// Per-border, per-rotation feature vectors and their validated catalog
pub mod features;
/// Reconstruction grid and placed tiles
pub mod grid;
/// Tile identifiers, border sides and rotations
pub mod tiles;

pub use grid::{Grid, PlacedTile};
pub use tiles::{Border, Rotation, SourceIndex, TileId};
