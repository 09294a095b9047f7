//! Mathematical utilities for scoring and search

/// Acceptance rule for the annealing random walk
pub mod probability;
/// Distance and similarity measures over feature vectors
pub mod similarity;
