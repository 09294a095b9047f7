//! Multi-modal border compatibility scoring
//!
//! Each modality yields a similarity in `[0, 1]`; the combined score is their
//! weighted sum. Weights are applied exactly as given and never renormalized,
//! so a caller that wants a score in `[0, 1]` passes weights that sum to one.

use crate::io::configuration::{
    COLOR_MAX_DISTANCE, DEFAULT_COLOR_WEIGHT, DEFAULT_DEEP_LAYER, DEFAULT_DEEP_WEIGHT,
    DEFAULT_TEXTURE_WEIGHT, TEXTURE_MAX_DISTANCE,
};
use crate::io::error::{Result, invalid_parameter};
use crate::math::similarity::{
    chi_square_distance, comparable, cosine_similarity, distance_to_similarity,
    euclidean_distance,
};
use crate::spatial::features::{BorderFeatureSet, FeatureLookup};
use crate::spatial::tiles::{Border, Rotation, TileId};
use serde::{Deserialize, Serialize};

/// Linear weight of each modality in the combined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityWeights {
    /// Colour histogram weight
    pub color: f64,
    /// Texture statistics weight
    pub texture: f64,
    /// Deep-feature weight
    pub deep: f64,
}

impl Default for CompatibilityWeights {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR_WEIGHT,
            texture: DEFAULT_TEXTURE_WEIGHT,
            deep: DEFAULT_DEEP_WEIGHT,
        }
    }
}

impl CompatibilityWeights {
    /// Weights for colour, texture and deep features
    pub const fn new(color: f64, texture: f64, deep: f64) -> Self {
        Self {
            color,
            texture,
            deep,
        }
    }

    /// Sum of the three weights
    pub const fn total(&self) -> f64 {
        self.color + self.texture + self.deep
    }

    /// Check every weight is finite and non-negative
    ///
    /// # Errors
    ///
    /// Returns [`crate::AlgorithmError::InvalidParameter`] naming the first
    /// offending weight
    pub fn validate(&self) -> Result<()> {
        for (parameter, weight) in [
            ("weights.color", self.color),
            ("weights.texture", self.texture),
            ("weights.deep", self.deep),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid_parameter(
                    parameter,
                    &weight,
                    &"weights must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }
}

/// Per-modality similarities and their weighted combination
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    /// Colour histogram similarity
    pub color: f64,
    /// Texture similarity
    pub texture: f64,
    /// Deep-feature similarity
    pub deep: f64,
    /// Weighted sum of the three similarities
    pub combined: f64,
}

/// Scoring parameters shared by every comparison of one adjacency build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Modality weights
    pub weights: CompatibilityWeights,
    /// Network layer whose vectors the deep modality compares
    pub deep_layer: String,
    /// Chi-square distance mapped to zero colour similarity
    pub color_max_distance: f64,
    /// Euclidean distance mapped to zero texture similarity
    pub texture_max_distance: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: CompatibilityWeights::default(),
            deep_layer: DEFAULT_DEEP_LAYER.to_string(),
            color_max_distance: COLOR_MAX_DISTANCE,
            texture_max_distance: TEXTURE_MAX_DISTANCE,
        }
    }
}

impl ScoringConfig {
    /// Default distances and layer with the given weights
    pub fn with_weights(weights: CompatibilityWeights) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }

    /// Validate weights and normalization distances
    ///
    /// # Errors
    ///
    /// Returns [`crate::AlgorithmError::InvalidParameter`] for negative or
    /// non-finite weights and non-positive normalization distances
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        for (parameter, distance) in [
            ("color_max_distance", self.color_max_distance),
            ("texture_max_distance", self.texture_max_distance),
        ] {
            if !distance.is_finite() || distance <= 0.0 {
                return Err(invalid_parameter(
                    parameter,
                    &distance,
                    &"normalization distance must be finite and positive",
                ));
            }
        }
        Ok(())
    }
}

/// Pure, deterministic border compatibility scorer
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    config: ScoringConfig,
}

impl CompatibilityScorer {
    /// Scorer for a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Colour similarity from chi-square distance; zero if either histogram is unusable
    pub fn color_similarity(&self, a: &BorderFeatureSet, b: &BorderFeatureSet) -> f64 {
        match (a.color(), b.color()) {
            (Some(x), Some(y)) if comparable(x, y) => {
                distance_to_similarity(chi_square_distance(x, y), self.config.color_max_distance)
            }
            _ => 0.0,
        }
    }

    /// Texture similarity from Euclidean distance; zero if either vector is unusable
    pub fn texture_similarity(&self, a: &BorderFeatureSet, b: &BorderFeatureSet) -> f64 {
        match (a.texture(), b.texture()) {
            (Some(x), Some(y)) if comparable(x, y) => {
                distance_to_similarity(euclidean_distance(x, y), self.config.texture_max_distance)
            }
            _ => 0.0,
        }
    }

    /// Cosine similarity of the configured layer; zero if the layer is missing on either side
    pub fn deep_similarity(&self, a: &BorderFeatureSet, b: &BorderFeatureSet) -> f64 {
        let layer = self.config.deep_layer.as_str();
        match (a.deep_layer(layer), b.deep_layer(layer)) {
            (Some(x), Some(y)) if comparable(x, y) => cosine_similarity(x, y),
            _ => 0.0,
        }
    }

    /// Score two border feature sets
    ///
    /// `b` is expected to already be the candidate's features at the rotation
    /// under consideration.
    pub fn score(&self, a: &BorderFeatureSet, b: &BorderFeatureSet) -> ScoreBreakdown {
        let color = self.color_similarity(a, b);
        let texture = self.texture_similarity(a, b);
        let deep = self.deep_similarity(a, b);
        let weights = &self.config.weights;

        ScoreBreakdown {
            color,
            texture,
            deep,
            combined: weights
                .color
                .mul_add(color, weights.texture.mul_add(texture, weights.deep * deep)),
        }
    }

    /// Score `border_a` of the unrotated `tile_a` against `border_b` of
    /// `tile_b` turned by `rotation`
    ///
    /// A slot with no extracted features scores zero in every modality.
    pub fn score_pair<F>(
        &self,
        features: &F,
        tile_a: TileId,
        border_a: Border,
        tile_b: TileId,
        border_b: Border,
        rotation: Rotation,
    ) -> ScoreBreakdown
    where
        F: FeatureLookup + ?Sized,
    {
        match (
            features.border_features(tile_a, Rotation::R0, border_a),
            features.border_features(tile_b, rotation, border_b),
        ) {
            (Some(a), Some(b)) => self.score(a, b),
            _ => ScoreBreakdown::default(),
        }
    }
}
