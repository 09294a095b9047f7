//! Evaluation of reconstructions and summaries of adjacency builds

/// Accuracy of a reconstructed grid against ground truth
pub mod accuracy;
/// Recorded shuffle mapping working tiles to source positions
pub mod ground_truth;
/// Summary statistics of adjacency scores
pub mod statistics;
