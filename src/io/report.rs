//! JSON report of one reconstruction run

use crate::algorithm::annealing::AnnealingOutcome;
use crate::algorithm::table::AdjacencyTable;
use crate::analysis::accuracy::AccuracyReport;
use crate::analysis::statistics::AdjacencyStatistics;
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::grid::Grid;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Greedy result with its accuracy when ground truth was available
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GreedyReport {
    /// Reconstructed grid; unfilled cells are `null`
    pub grid: Grid,
    /// Number of filled cells
    pub placed: usize,
    /// Accuracy against ground truth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<AccuracyReport>,
}

/// Annealing result with its accuracy when ground truth was available
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnealingReport {
    /// Best grid and run counters
    #[serde(flatten)]
    pub outcome: AnnealingOutcome,
    /// Accuracy against ground truth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<AccuracyReport>,
}

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Side length of the grid
    pub grid_size: usize,
    /// Number of tiles
    pub total_tiles: usize,
    /// Summary of the adjacency build
    pub statistics: AdjacencyStatistics,
    /// Full top-K table, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjacency: Option<AdjacencyTable>,
    /// Greedy solver result
    pub greedy: GreedyReport,
    /// Annealing solver result
    pub annealing: AnnealingReport,
}

/// Serialize a report as pretty JSON to `writer`
///
/// # Errors
///
/// Returns [`AlgorithmError::Document`] if serialization fails and
/// [`AlgorithmError::FileSystem`] if writing fails
pub fn write_report<W: Write>(report: &RunReport, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write a report to a file, replacing any existing content
///
/// # Errors
///
/// Returns [`AlgorithmError::FileSystem`] if the file cannot be created and
/// [`AlgorithmError::Document`] if serialization fails
pub fn save_report(report: &RunReport, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| AlgorithmError::FileSystem {
        path: path.to_path_buf(),
        operation: "create",
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).map_err(|source| AlgorithmError::Document {
        path: path.to_path_buf(),
        source,
    })?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|source| AlgorithmError::FileSystem {
            path: path.to_path_buf(),
            operation: "write",
            source,
        })
}
