//! Border compatibility scoring and grid reconstruction for shuffled, rotated image tiles
//!
//! Every border of every tile is scored against every border of every other
//! tile at all four rotations, combining colour, texture and deep-feature
//! similarity. The scores are reduced to a ranked top-K table that drives a
//! greedy solver and a simulated annealing solver, and reconstructions are
//! scored against the recorded shuffle.

#![forbid(unsafe_code)]

/// Adjacency engine, score lookups and the reconstruction solvers
pub mod algorithm;
/// Ground truth, accuracy evaluation and build statistics
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Similarity measures and acceptance probabilities
pub mod math;
/// Tile identifiers, feature sets and the reconstruction grid
pub mod spatial;

pub use io::error::{AlgorithmError, Result};
