//! Command-line interface running a full reconstruction from JSON documents

use crate::algorithm::adjacency::{AdjacencyEngine, BorderPairing, EngineConfig};
use crate::algorithm::annealing::{AnnealingParams, AnnealingSolver};
use crate::algorithm::greedy::{GreedyConfig, GreedySolver};
use crate::algorithm::index::CompatibilityLookup;
use crate::algorithm::rotation::{FirstNeighbor, RotationPolicy, StrongestNeighbor};
use crate::algorithm::scorer::{CompatibilityWeights, ScoringConfig};
use crate::algorithm::table::AdjacencyTable;
use crate::analysis::accuracy::evaluate;
use crate::analysis::ground_truth::GroundTruth;
use crate::io::configuration::{
    COLOR_MAX_DISTANCE, DEFAULT_ANNEALING_ITERATIONS, DEFAULT_COLOR_WEIGHT, DEFAULT_COOLING_RATE,
    DEFAULT_DEEP_LAYER, DEFAULT_DEEP_WEIGHT, DEFAULT_INITIAL_TEMPERATURE, DEFAULT_TEXTURE_WEIGHT,
    DEFAULT_TOP_K, GREEDY_ACCEPTANCE_THRESHOLD, ReconstructionConfig, TEXTURE_MAX_DISTANCE,
};
use crate::io::error::{Result, invalid_input};
use crate::io::input::{infer_grid_size, load_features, load_ground_truth};
use crate::io::progress::ProgressManager;
use crate::io::report::{AnnealingReport, GreedyReport, RunReport, save_report, write_report};
use crate::spatial::features::TileCatalog;
use crate::spatial::grid::Grid;
use crate::spatial::tiles::TileId;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

/// Candidate borders scored by the adjacency engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PairingArg {
    /// Only the physically touching border
    Opposite,
    /// All four borders
    All,
}

impl From<PairingArg> for BorderPairing {
    fn from(arg: PairingArg) -> Self {
        match arg {
            PairingArg::Opposite => Self::Opposite,
            PairingArg::All => Self::All,
        }
    }
}

/// Rotation choice for greedy placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RotationArg {
    /// Best entry against the first placed neighbour
    First,
    /// Best entry across all placed neighbours
    Strongest,
}

/// Scores the annealing energy is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LookupArg {
    /// Every computed score
    Index,
    /// Only scores that survived top-K truncation
    Table,
}

#[derive(Parser)]
#[command(name = "tilematch")]
#[command(
    author,
    version,
    about = "Reconstruct a shuffled tile grid from extracted border features"
)]
/// Command-line arguments for a reconstruction run
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Feature document produced by the extractor
    #[arg(value_name = "FEATURES")]
    pub features: PathBuf,

    /// Shuffle document used to score the reconstructions
    #[arg(short, long)]
    pub shuffle: Option<PathBuf>,

    /// Write the JSON report here instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Side length of the grid; taken from the documents when omitted
    #[arg(short, long)]
    pub grid_size: Option<usize>,

    /// Candidates kept per tile border
    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Colour histogram weight
    #[arg(long, default_value_t = DEFAULT_COLOR_WEIGHT)]
    pub color_weight: f64,

    /// Texture weight
    #[arg(long, default_value_t = DEFAULT_TEXTURE_WEIGHT)]
    pub texture_weight: f64,

    /// Deep-feature weight
    #[arg(long, default_value_t = DEFAULT_DEEP_WEIGHT)]
    pub deep_weight: f64,

    /// Network layer compared by the deep modality
    #[arg(short, long, default_value = DEFAULT_DEEP_LAYER)]
    pub layer: String,

    /// Candidate borders to score
    #[arg(long, value_enum, default_value_t = PairingArg::Opposite)]
    pub pairing: PairingArg,

    /// Score every anchor group on the calling thread
    #[arg(long)]
    pub sequential: bool,

    /// Tile placed first by the greedy solver
    #[arg(long, default_value_t = 0)]
    pub seed_tile: usize,

    /// Average score a greedy candidate must exceed
    #[arg(long, default_value_t = GREEDY_ACCEPTANCE_THRESHOLD)]
    pub threshold: f64,

    /// Rotation choice for greedy placement
    #[arg(long, value_enum, default_value_t = RotationArg::First)]
    pub rotation: RotationArg,

    /// Initial annealing temperature
    #[arg(short, long, default_value_t = DEFAULT_INITIAL_TEMPERATURE)]
    pub temperature: f64,

    /// Annealing cooling rate
    #[arg(short, long, default_value_t = DEFAULT_COOLING_RATE)]
    pub cooling: f64,

    /// Annealing iterations
    #[arg(short, long, default_value_t = DEFAULT_ANNEALING_ITERATIONS)]
    pub iterations: usize,

    /// Annealing random seed; drawn at random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Scores the annealing energy is computed from
    #[arg(long, value_enum, default_value_t = LookupArg::Index)]
    pub lookup: LookupArg,

    /// Include the full top-K table in the report
    #[arg(short = 'a', long)]
    pub include_table: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Reconstruction settings for a grid of `grid_size`
    pub fn config(&self, grid_size: usize) -> ReconstructionConfig {
        ReconstructionConfig {
            grid_size,
            engine: EngineConfig {
                scoring: ScoringConfig {
                    weights: CompatibilityWeights::new(
                        self.color_weight,
                        self.texture_weight,
                        self.deep_weight,
                    ),
                    deep_layer: self.layer.clone(),
                    color_max_distance: COLOR_MAX_DISTANCE,
                    texture_max_distance: TEXTURE_MAX_DISTANCE,
                },
                top_k: self.top_k,
                pairing: self.pairing.into(),
                parallel: !self.sequential,
            },
            greedy: GreedyConfig {
                acceptance_threshold: self.threshold,
            },
            annealing: AnnealingParams {
                initial_temperature: self.temperature,
                cooling_rate: self.cooling,
                iterations: self.iterations,
                seed: self.seed,
            },
        }
    }
}

/// Runs one reconstruction as described by the command line
pub struct ReconstructionRunner {
    cli: Cli,
    progress: ProgressManager,
}

impl ReconstructionRunner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress = ProgressManager::new(cli.should_show_progress());
        Self { cli, progress }
    }

    /// Run and write the report to the requested destination
    ///
    /// # Errors
    ///
    /// Returns an error if loading, validation, solving or writing fails
    pub fn process(&self) -> Result<()> {
        let report = self.run()?;
        match &self.cli.output {
            Some(path) => {
                save_report(&report, path)?;
                info!(path = %path.display(), "report written");
                Ok(())
            }
            None => write_report(&report, std::io::stdout().lock()),
        }
    }

    /// Run the full pipeline and return the report
    ///
    /// # Errors
    ///
    /// Returns an error if loading, validation or solving fails
    pub fn run(&self) -> Result<RunReport> {
        let document = load_features(&self.cli.features)?;
        let recorded_size = document.grid_size;
        let catalog = document.into_catalog()?;
        let truth = self
            .cli
            .shuffle
            .as_deref()
            .map(load_ground_truth)
            .transpose()?;

        let grid_size = self.resolve_grid_size(&catalog, recorded_size, truth.as_ref())?;
        let config = self.cli.config(grid_size);
        config.validate()?;
        info!(grid_size, tiles = catalog.len(), "starting reconstruction");

        let engine = AdjacencyEngine::new(config.engine.clone())?;
        let build_bar = self.progress.build_bar(catalog.len());
        let adjacency = engine.build_observed(&catalog, None, &build_bar)?;
        build_bar.finish();

        let total_tiles = config.total_tiles();
        let seed_tile = TileId(self.cli.seed_tile);
        let greedy_grid = match self.cli.rotation {
            RotationArg::First => Self::run_greedy(&config, FirstNeighbor, &adjacency.table, seed_tile)?,
            RotationArg::Strongest => {
                Self::run_greedy(&config, StrongestNeighbor, &adjacency.table, seed_tile)?
            }
        };

        let solver = AnnealingSolver::new(config.annealing)?;
        let mut annealing_bar = self.progress.annealing_bar(config.annealing.iterations);
        let lookup: &dyn CompatibilityLookup = match self.cli.lookup {
            LookupArg::Index => &adjacency.index,
            LookupArg::Table => &adjacency.table,
        };
        let outcome = solver.solve_observed(lookup, grid_size, total_tiles, None, &mut annealing_bar)?;
        annealing_bar.finish();
        self.progress.finish();

        let greedy_accuracy = truth.as_ref().map(|truth| evaluate(&greedy_grid, truth)).transpose()?;
        let annealing_accuracy = truth.as_ref().map(|truth| evaluate(&outcome.grid, truth)).transpose()?;

        if let Some(accuracy) = &greedy_accuracy {
            info!(
                position = accuracy.position_accuracy,
                rotation = accuracy.rotation_accuracy,
                "greedy accuracy"
            );
        }
        if let Some(accuracy) = &annealing_accuracy {
            info!(
                position = accuracy.position_accuracy,
                rotation = accuracy.rotation_accuracy,
                "annealing accuracy"
            );
        }

        Ok(RunReport {
            grid_size,
            total_tiles,
            statistics: adjacency.statistics,
            adjacency: self.cli.include_table.then_some(adjacency.table),
            greedy: GreedyReport {
                placed: greedy_grid.placed_count(),
                grid: greedy_grid,
                accuracy: greedy_accuracy,
            },
            annealing: AnnealingReport {
                outcome,
                accuracy: annealing_accuracy,
            },
        })
    }

    fn run_greedy<P: RotationPolicy>(
        config: &ReconstructionConfig,
        policy: P,
        table: &AdjacencyTable,
        seed_tile: TileId,
    ) -> Result<Grid> {
        GreedySolver::with_policy(config.greedy, policy)?.solve(
            table,
            config.grid_size,
            config.total_tiles(),
            seed_tile,
        )
    }

    fn resolve_grid_size(
        &self,
        catalog: &TileCatalog,
        recorded: Option<usize>,
        truth: Option<&GroundTruth>,
    ) -> Result<usize> {
        let grid_size = match (self.cli.grid_size, recorded, truth) {
            (Some(size), _, _) | (None, Some(size), _) => size,
            (None, None, Some(truth)) => truth.grid_size(),
            (None, None, None) => infer_grid_size(catalog.len())?,
        };

        if let Some(truth) = truth
            && truth.grid_size() != grid_size
        {
            return Err(invalid_input(&format!(
                "shuffle document describes a {0}x{0} grid, features a {grid_size}x{grid_size} one",
                truth.grid_size()
            )));
        }
        Ok(grid_size)
    }
}
