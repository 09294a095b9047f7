//! Algorithm constants and runtime configuration defaults

use crate::algorithm::adjacency::EngineConfig;
use crate::algorithm::annealing::AnnealingParams;
use crate::algorithm::greedy::GreedyConfig;
use crate::io::error::{Result, invalid_parameter};

// Scoring defaults
/// Default weight of the colour histogram modality
pub const DEFAULT_COLOR_WEIGHT: f64 = 0.4;
/// Default weight of the texture modality
pub const DEFAULT_TEXTURE_WEIGHT: f64 = 0.3;
/// Default weight of the deep-feature modality
pub const DEFAULT_DEEP_WEIGHT: f64 = 0.3;
/// Default network layer compared by the deep modality
pub const DEFAULT_DEEP_LAYER: &str = "block_6_expand_relu";

// Chi-square between two normalized histograms never exceeds 2
/// Distance at which colour similarity reaches zero
pub const COLOR_MAX_DISTANCE: f64 = 2.0;
/// Distance at which texture similarity reaches zero
pub const TEXTURE_MAX_DISTANCE: f64 = 200.0;

// Adjacency table defaults
/// Number of ranked candidates kept per tile border
pub const DEFAULT_TOP_K: usize = 10;

// Greedy placement
/// Average compatibility a candidate must exceed to be placed
pub const GREEDY_ACCEPTANCE_THRESHOLD: f64 = 0.3;

// Simulated annealing defaults
/// Starting temperature
pub const DEFAULT_INITIAL_TEMPERATURE: f64 = 100.0;
/// Geometric cooling factor applied after every iteration
pub const DEFAULT_COOLING_RATE: f64 = 0.95;
/// Number of perturbations attempted
pub const DEFAULT_ANNEALING_ITERATIONS: usize = 1000;
/// Energy charged for an adjacent pair with no scored entry
pub const UNMATCHED_PAIR_PENALTY: f64 = 1.0;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
/// Annealing iterations between progress bar refreshes
pub const PROGRESS_REFRESH_INTERVAL: usize = 100;

/// Immutable configuration threaded through a complete reconstruction run
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionConfig {
    /// Side length of the square tile grid
    pub grid_size: usize,
    /// Adjacency engine settings, including scoring weights
    pub engine: EngineConfig,
    /// Greedy solver settings
    pub greedy: GreedyConfig,
    /// Annealing solver settings
    pub annealing: AnnealingParams,
}

impl ReconstructionConfig {
    /// Default settings for a grid of `grid_size × grid_size` tiles
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            engine: EngineConfig::default(),
            greedy: GreedyConfig::default(),
            annealing: AnnealingParams::default(),
        }
    }

    /// Number of tiles the grid holds
    pub const fn total_tiles(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Validate every nested setting
    ///
    /// # Errors
    ///
    /// Returns [`crate::AlgorithmError::InvalidParameter`] for a zero grid size
    /// or any invalid nested parameter
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(invalid_parameter(
                "grid_size",
                &self.grid_size,
                &"grid must hold at least one tile",
            ));
        }
        self.engine.validate()?;
        self.greedy.validate()?;
        self.annealing.validate()
    }
}
