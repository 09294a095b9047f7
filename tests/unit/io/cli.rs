//! Tests for argument parsing and the reconstruction runner

#[cfg(test)]
mod tests {
    use clap::Parser;
    use serde_json::json;
    use std::path::Path;
    use tilematch::AlgorithmError;
    use tilematch::algorithm::adjacency::BorderPairing;
    use tilematch::io::cli::{Cli, LookupArg, ReconstructionRunner, RotationArg};

    fn border(value: f64) -> serde_json::Value {
        json!({ "colorHistogram": [value, 1.0 - value], "textureStats": [value * 100.0, 5.0] })
    }

    fn path_string(path: &Path) -> String {
        path.to_str().unwrap().to_owned()
    }

    /// Features for a 2x2 image whose touching borders are identical
    fn write_documents(dir: &Path, record_grid_size: bool) -> (String, String) {
        // (top, right, bottom, left) per tile in row-major order
        let edges = [
            (0.05, 0.90, 0.15, 0.70),
            (0.25, 0.95, 0.60, 0.90),
            (0.15, 0.35, 0.45, 0.80),
            (0.60, 0.55, 0.85, 0.35),
        ];
        let tiles = edges
            .iter()
            .enumerate()
            .map(|(id, &(top, right, bottom, left))| {
                json!({
                    "tileIndex": id,
                    "borderFeatures": {
                        "top": border(top), "right": border(right), "bottom": border(bottom), "left": border(left)
                    }
                })
            })
            .collect::<Vec<_>>();
        let mut features = json!({ "tiles": tiles });
        if record_grid_size {
            features["gridSize"] = json!(2);
        }

        let shuffle = json!({
            "gridSize": 2,
            "tiles": (0..4).map(|i| json!({ "sourceIndex": i, "destPosition": i })).collect::<Vec<_>>()
        });

        let features_path = dir.join("features.json");
        let shuffle_path = dir.join("shuffle.json");
        std::fs::write(&features_path, serde_json::to_vec(&features).unwrap()).unwrap();
        std::fs::write(&shuffle_path, serde_json::to_vec(&shuffle).unwrap()).unwrap();
        (path_string(&features_path), path_string(&shuffle_path))
    }

    // Tests defaults and overrides reach the run configuration
    // Verified by ignoring the sequential flag
    #[test]
    fn test_parse_into_config() {
        let cli = Cli::try_parse_from(["tilematch", "features.json"]).unwrap();
        let config = cli.config(3);
        assert_eq!(config.grid_size, 3);
        assert_eq!(config.engine.top_k, 10);
        assert_eq!(config.engine.pairing, BorderPairing::Opposite);
        assert!(config.engine.parallel);
        assert_eq!(config.annealing.seed, None);
        assert_eq!(cli.rotation, RotationArg::First);
        assert_eq!(cli.lookup, LookupArg::Index);
        assert!(cli.should_show_progress());

        let cli = Cli::try_parse_from([
            "tilematch",
            "features.json",
            "-k",
            "3",
            "--pairing",
            "all",
            "--sequential",
            "--rotation",
            "strongest",
            "--lookup",
            "table",
            "--seed",
            "11",
            "-i",
            "50",
            "-q",
        ])
        .unwrap();
        let config = cli.config(2);
        assert_eq!(config.engine.top_k, 3);
        assert_eq!(config.engine.pairing, BorderPairing::All);
        assert!(!config.engine.parallel);
        assert_eq!(config.annealing.seed, Some(11));
        assert_eq!(config.annealing.iterations, 50);
        assert_eq!(cli.rotation, RotationArg::Strongest);
        assert!(!cli.should_show_progress());
    }

    // Tests a full run produces both reconstructions and their accuracy
    // Verified by skipping evaluation when a shuffle document is given
    #[test]
    fn test_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let (features, shuffle) = write_documents(dir.path(), false);

        let cli = Cli::try_parse_from([
            "tilematch",
            features.as_str(),
            "-s",
            shuffle.as_str(),
            "--seed",
            "5",
            "-i",
            "200",
            "--color-weight",
            "0.5",
            "--texture-weight",
            "0.5",
            "--deep-weight",
            "0",
            "-q",
        ])
        .unwrap();
        let report = ReconstructionRunner::new(cli).run().unwrap();

        assert_eq!(report.grid_size, 2);
        assert_eq!(report.total_tiles, 4);
        assert_eq!(report.statistics.total_comparisons, 4 * 4 * 3 * 4);
        assert!(report.adjacency.is_none());
        assert!(report.greedy.placed >= 1);
        assert!(report.greedy.grid.has_unique_tiles());
        assert!(report.greedy.accuracy.is_some());
        assert!(report.annealing.outcome.grid.is_complete());
        assert_eq!(report.annealing.outcome.seed, 5);
        assert_eq!(report.annealing.outcome.iterations_run, 200);
        assert!(report.annealing.accuracy.is_some());
    }

    // Tests the report is written to the output file with the table when asked
    // Verified by writing to standard output regardless of the output flag
    #[test]
    fn test_process_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let (features, _) = write_documents(dir.path(), true);
        let output = path_string(&dir.path().join("report.json"));

        let cli = Cli::try_parse_from([
            "tilematch",
            features.as_str(),
            "-o",
            output.as_str(),
            "-a",
            "-i",
            "20",
            "-q",
        ])
        .unwrap();
        ReconstructionRunner::new(cli).process().unwrap();

        let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(json["gridSize"], 2);
        assert_eq!(json["adjacency"]["tileCount"], 4);
        assert!(json["greedy"].get("accuracy").is_none());
    }

    // Tests conflicting grid sizes and non-square tile counts are rejected
    // Verified by trusting the command-line grid size over the shuffle document
    #[test]
    fn test_grid_size_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let (features, shuffle) = write_documents(dir.path(), false);

        let cli = Cli::try_parse_from([
            "tilematch",
            features.as_str(),
            "-s",
            shuffle.as_str(),
            "-g",
            "3",
            "-q",
        ])
        .unwrap();
        assert!(matches!(
            ReconstructionRunner::new(cli).run(),
            Err(AlgorithmError::InvalidInput { .. })
        ));

        let cli = Cli::try_parse_from([
            "tilematch",
            features.as_str(),
            "-g",
            "3",
            "-q",
        ])
        .unwrap();
        assert!(ReconstructionRunner::new(cli).run().is_err());
    }
}
