//! Summary statistics of every combined score computed during an adjacency build
//!
//! Accumulation uses Welford's update with Chan's pairwise merge so partial
//! accumulators built on separate threads combine without a second pass.

use crate::algorithm::table::{AdjacencyEntry, ranking_order};
use serde::Serialize;
use std::cmp::Ordering;

/// Aggregate view of one adjacency build
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjacencyStatistics {
    /// Number of pairings scored
    pub total_comparisons: usize,
    /// Number of entries kept after top-K truncation
    pub filtered_matches: usize,
    /// Mean combined score over every comparison
    #[serde(rename = "averageCompatibility")]
    pub mean: f64,
    /// Population standard deviation of the combined score
    #[serde(rename = "stdCompatibility")]
    pub std: f64,
    /// Lowest combined score
    #[serde(rename = "minCompatibility")]
    pub min: f64,
    /// Highest combined score
    #[serde(rename = "maxCompatibility")]
    pub max: f64,
    /// Highest-scoring entry overall
    pub best_match: Option<AdjacencyEntry>,
}

impl AdjacencyStatistics {
    /// Statistics of a build that scored nothing
    pub const fn empty() -> Self {
        Self {
            total_comparisons: 0,
            filtered_matches: 0,
            mean: 0.0,
            std: 0.0,
            min: 0.0,
            max: 0.0,
            best_match: None,
        }
    }
}

/// Running accumulator for [`AdjacencyStatistics`]
#[derive(Debug, Clone, Default)]
pub struct StatisticsAccumulator {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
    best: Option<AdjacencyEntry>,
}

impl StatisticsAccumulator {
    /// Accumulator with no observations
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one scored pairing
    pub fn push(&mut self, entry: &AdjacencyEntry) {
        let score = entry.combined();
        if self.count == 0 {
            self.min = score;
            self.max = score;
        } else {
            self.min = self.min.min(score);
            self.max = self.max.max(score);
        }

        self.count += 1;
        let delta = score - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 = delta.mul_add(score - self.mean, self.m2);

        self.offer_best(entry);
    }

    /// Fold in an accumulator built over a later part of the same build
    ///
    /// On equal best scores the entry already held wins, so merging in build
    /// order keeps the earliest best entry.
    pub fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let total = (self.count + other.count) as f64;
        let delta = other.mean - self.mean;
        let weight = (self.count as f64 * other.count as f64) / total;

        self.mean = delta.mul_add(other.count as f64 / total, self.mean);
        self.m2 = (delta * delta).mul_add(weight, self.m2 + other.m2);
        self.count += other.count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);

        if let Some(best) = other.best.as_ref() {
            self.offer_best(best);
        }
    }

    fn offer_best(&mut self, entry: &AdjacencyEntry) {
        let replace = self.best.as_ref().is_none_or(|best| {
            entry.combined() > best.combined()
                || (entry.tile_a == best.tile_a
                    && entry.border_a == best.border_a
                    && ranking_order(entry, best) == Ordering::Less)
        });
        if replace {
            self.best = Some(*entry);
        }
    }

    /// Number of observations
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Final statistics, given how many entries survived truncation
    pub fn finish(&self, filtered_matches: usize) -> AdjacencyStatistics {
        if self.count == 0 {
            return AdjacencyStatistics {
                filtered_matches,
                ..AdjacencyStatistics::empty()
            };
        }

        AdjacencyStatistics {
            total_comparisons: self.count,
            filtered_matches,
            mean: self.mean,
            std: (self.m2 / self.count as f64).max(0.0).sqrt(),
            min: self.min,
            max: self.max,
            best_match: self.best,
        }
    }
}
