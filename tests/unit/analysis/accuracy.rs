//! Tests for position and rotation accuracy

#[cfg(test)]
mod tests {
    use tilematch::AlgorithmError;
    use tilematch::analysis::accuracy::evaluate;
    use tilematch::analysis::ground_truth::{GroundTruth, ShuffleRecord};
    use tilematch::spatial::grid::{Grid, PlacedTile};
    use tilematch::spatial::tiles::{Rotation, SourceIndex, TileId};

    fn identity_grid(size: usize) -> Grid {
        let mut grid = Grid::new(size);
        for cell in 0..size * size {
            grid.place(cell / size, cell % size, PlacedTile::new(TileId(cell), Rotation::R0));
        }
        grid
    }

    // Tests an unshuffled grid scores full marks
    // Verified by comparing working ids with cell indices instead of source indices
    #[test]
    fn test_identity_is_perfect() {
        let report = evaluate(&identity_grid(3), &GroundTruth::identity(3)).unwrap();
        assert_eq!(report.correct_positions, 9);
        assert_eq!(report.correct_rotations, 9);
        assert_eq!(report.total_tiles, 9);
        assert!((report.position_accuracy - 100.0).abs() < 1e-12);
        assert!((report.rotation_accuracy - 100.0).abs() < 1e-12);
    }

    // Tests a turned tile only costs rotation accuracy
    // Verified by requiring the rotation for position correctness
    #[test]
    fn test_rotated_tile() {
        let mut grid = identity_grid(2);
        grid.set_rotation(1, 0, Rotation::R90);

        let report = evaluate(&grid, &GroundTruth::identity(2)).unwrap();
        assert_eq!(report.correct_positions, 4);
        assert_eq!(report.correct_rotations, 3);
        assert!((report.position_accuracy - 100.0).abs() < 1e-12);
        assert!((report.rotation_accuracy - 75.0).abs() < 1e-12);
    }

    // Tests placement is judged through the source index of each working tile
    // Verified by treating the working id as the original position
    #[test]
    fn test_shuffled_truth() {
        let truth = GroundTruth::new(
            2,
            vec![
                ShuffleRecord {
                    source_index: SourceIndex(3),
                    dest_position: TileId(0),
                    rotation: Rotation::R90,
                },
                ShuffleRecord {
                    source_index: SourceIndex(2),
                    dest_position: TileId(1),
                    rotation: Rotation::R0,
                },
                ShuffleRecord {
                    source_index: SourceIndex(1),
                    dest_position: TileId(2),
                    rotation: Rotation::R180,
                },
                ShuffleRecord {
                    source_index: SourceIndex(0),
                    dest_position: TileId(3),
                    rotation: Rotation::R0,
                },
            ],
        )
        .unwrap();

        let mut solved = Grid::new(2);
        solved.place(0, 0, PlacedTile::new(TileId(3), Rotation::R0));
        solved.place(0, 1, PlacedTile::new(TileId(2), Rotation::R0));
        solved.place(1, 0, PlacedTile::new(TileId(1), Rotation::R0));
        solved.place(1, 1, PlacedTile::new(TileId(0), Rotation::R270));

        let report = evaluate(&solved, &truth).unwrap();
        assert_eq!(report.correct_positions, 4);
        assert_eq!(report.correct_rotations, 3);

        let unsolved = evaluate(&identity_grid(2), &truth).unwrap();
        assert_eq!(unsolved.correct_positions, 0);
        assert!(unsolved.position_accuracy.abs() < 1e-12);
    }

    // Tests empty cells count against the accuracy
    // Verified by dividing by the number of placed tiles
    #[test]
    fn test_partial_grid() {
        let mut grid = Grid::new(2);
        grid.place(0, 0, PlacedTile::new(TileId(0), Rotation::R0));

        let report = evaluate(&grid, &GroundTruth::identity(2)).unwrap();
        assert_eq!(report.correct_positions, 1);
        assert!((report.position_accuracy - 25.0).abs() < 1e-12);
    }

    // Tests a grid of the wrong size is rejected
    // Verified by evaluating only the overlapping cells
    #[test]
    fn test_size_mismatch() {
        assert!(matches!(
            evaluate(&identity_grid(2), &GroundTruth::identity(3)),
            Err(AlgorithmError::InvalidInput { .. })
        ));
    }
}
