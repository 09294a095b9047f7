//! Adjacency engine: exhaustive border scoring reduced to a ranked top-K table
//!
//! Work is split by anchor group `(tile_a, border_a)`. Each group scores every
//! other tile at every admissible border and rotation, ranks and truncates its
//! own candidates and returns its slice of the dense score index together with
//! a partial statistics accumulator. Groups are merged back in anchor order,
//! so a parallel build is bit-identical to a sequential one.

use crate::algorithm::cancel::{self, CancelFlag};
use crate::algorithm::index::ScoreIndex;
use crate::algorithm::scorer::{CompatibilityScorer, ScoringConfig};
use crate::algorithm::table::{AdjacencyEntry, AdjacencyTable, ranking_order};
use crate::analysis::statistics::{AdjacencyStatistics, StatisticsAccumulator};
use crate::io::configuration::DEFAULT_TOP_K;
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::spatial::features::FeatureLookup;
use crate::spatial::tiles::{Border, Rotation, TileId};
use ndarray::Array3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Which candidate borders are scored against each anchor border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderPairing {
    /// Only the border that physically touches the anchor border
    #[default]
    Opposite,
    /// All four candidate borders
    All,
}

impl BorderPairing {
    /// Candidate borders scored against `border_a`
    pub fn candidates(self, border_a: Border) -> Vec<Border> {
        match self {
            Self::Opposite => vec![border_a.opposite()],
            Self::All => Border::ALL.to_vec(),
        }
    }
}

/// Adjacency engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scorer weights, deep layer and normalization distances
    pub scoring: ScoringConfig,
    /// Candidates kept per `(tile, border)`
    pub top_k: usize,
    /// Candidate borders to score
    pub pairing: BorderPairing,
    /// Spread anchor groups over the rayon thread pool
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            top_k: DEFAULT_TOP_K,
            pairing: BorderPairing::default(),
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Validate scoring settings and `top_k`
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidParameter`] for invalid weights or
    /// distances, or a zero `top_k`
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        if self.top_k == 0 {
            return Err(invalid_parameter(
                "top_k",
                &self.top_k,
                &"at least one candidate must be kept",
            ));
        }
        Ok(())
    }
}

/// Receives build progress; called from worker threads
pub trait BuildObserver: Sync {
    /// One more anchor group finished out of `total`
    fn group_finished(&self, completed: usize, total: usize) {
        let _ = (completed, total);
    }
}

impl BuildObserver for () {}

/// Everything one build produces
#[derive(Debug, Clone)]
pub struct AdjacencyReport {
    /// Ranked top-K candidates per `(tile, border)`
    pub table: AdjacencyTable,
    /// Every computed combined score
    pub index: ScoreIndex,
    /// Summary of every computed score
    pub statistics: AdjacencyStatistics,
}

struct GroupResult {
    entries: Vec<AdjacencyEntry>,
    slab: Array3<f64>,
    statistics: StatisticsAccumulator,
}

/// Builds adjacency tables from tile features
#[derive(Debug, Clone)]
pub struct AdjacencyEngine {
    scorer: CompatibilityScorer,
    config: EngineConfig,
}

impl AdjacencyEngine {
    /// Engine for a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let scorer = CompatibilityScorer::new(config.scoring.clone())?;
        Ok(Self { scorer, config })
    }

    /// Active configuration
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scorer used for every comparison
    pub const fn scorer(&self) -> &CompatibilityScorer {
        &self.scorer
    }

    /// Score every pairing and reduce to the top-K table
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::Cancelled`] if `cancel` is raised before the
    /// last anchor group starts
    pub fn build<F>(&self, features: &F, cancel: Option<&CancelFlag>) -> Result<AdjacencyReport>
    where
        F: FeatureLookup + Sync + ?Sized,
    {
        self.build_observed(features, cancel, &())
    }

    /// [`Self::build`] reporting each finished anchor group to `observer`
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::Cancelled`] if `cancel` is raised before the
    /// last anchor group starts
    pub fn build_observed<F>(
        &self,
        features: &F,
        cancel: Option<&CancelFlag>,
        observer: &dyn BuildObserver,
    ) -> Result<AdjacencyReport>
    where
        F: FeatureLookup + Sync + ?Sized,
    {
        let tile_count = features.tile_count();
        let top_k = self.config.top_k;

        if tile_count < 2 {
            info!(tiles = tile_count, "fewer than two tiles, nothing to compare");
            return Ok(AdjacencyReport {
                table: AdjacencyTable::empty(tile_count, top_k),
                index: ScoreIndex::unscored(tile_count),
                statistics: AdjacencyStatistics::empty(),
            });
        }

        let total_groups = tile_count * Border::ALL.len();
        let completed = AtomicUsize::new(0);

        let run_group = |group: usize| -> Result<GroupResult> {
            if cancel::requested(cancel) {
                return Err(AlgorithmError::Cancelled {
                    operation: "adjacency build",
                    completed: completed.load(Ordering::Relaxed),
                    total: total_groups,
                });
            }
            let result = self.score_group(features, group, tile_count);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            observer.group_finished(done, total_groups);
            Ok(result)
        };

        debug!(
            tiles = tile_count,
            groups = total_groups,
            parallel = self.config.parallel,
            "scoring anchor groups"
        );
        let groups: Vec<GroupResult> = if self.config.parallel {
            (0..total_groups)
                .into_par_iter()
                .map(&run_group)
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..total_groups)
                .map(&run_group)
                .collect::<Result<Vec<_>>>()?
        };

        let mut index = ScoreIndex::unscored(tile_count);
        let mut accumulator = StatisticsAccumulator::new();
        let mut ranked = Vec::with_capacity(total_groups);
        for (group, result) in groups.into_iter().enumerate() {
            index.assign_group(group, &result.slab);
            accumulator.merge(&result.statistics);
            ranked.push(result.entries);
        }

        let table = AdjacencyTable::from_ranked_groups(tile_count, top_k, ranked);
        let statistics = accumulator.finish(table.len());

        info!(
            tiles = tile_count,
            comparisons = statistics.total_comparisons,
            kept = statistics.filtered_matches,
            mean = statistics.mean,
            "adjacency table built"
        );

        Ok(AdjacencyReport {
            table,
            index,
            statistics,
        })
    }

    fn score_group<F>(&self, features: &F, group: usize, tile_count: usize) -> GroupResult
    where
        F: FeatureLookup + ?Sized,
    {
        let tile_a = TileId(group / Border::ALL.len());
        let border_a = Border::from_index(group % Border::ALL.len());
        let candidate_borders = self.config.pairing.candidates(border_a);

        let mut slab = Array3::from_elem((tile_count, Border::ALL.len(), Rotation::ALL.len()), f64::NAN);
        let mut entries = Vec::with_capacity(tile_count * candidate_borders.len() * Rotation::ALL.len());
        let mut statistics = StatisticsAccumulator::new();

        for tile_b in (0..tile_count).map(TileId).filter(|&tile| tile != tile_a) {
            for &border_b in &candidate_borders {
                for rotation in Rotation::ALL {
                    let scores = self
                        .scorer
                        .score_pair(features, tile_a, border_a, tile_b, border_b, rotation);
                    let entry = AdjacencyEntry {
                        tile_a,
                        border_a,
                        tile_b,
                        border_b,
                        rotation,
                        scores,
                    };

                    if let Some(slot) =
                        slab.get_mut([tile_b.index(), border_b.index(), rotation.quarter_turns()])
                    {
                        *slot = scores.combined;
                    }
                    statistics.push(&entry);
                    entries.push(entry);
                }
            }
        }

        entries.sort_by(ranking_order);
        entries.truncate(self.config.top_k);

        GroupResult {
            entries,
            slab,
            statistics,
        }
    }
}
