//! Tests for top-K ranking, tie-breaks and table queries

#[cfg(test)]
mod tests {
    use tilematch::AlgorithmError;
    use tilematch::algorithm::scorer::ScoreBreakdown;
    use tilematch::algorithm::table::{AdjacencyEntry, AdjacencyTable};
    use tilematch::spatial::tiles::{Border, Rotation, TileId};

    fn entry(a: usize, border_a: Border, b: usize, rotation: Rotation, score: f64) -> AdjacencyEntry {
        AdjacencyEntry {
            tile_a: TileId(a),
            border_a,
            tile_b: TileId(b),
            border_b: border_a.opposite(),
            rotation,
            scores: ScoreBreakdown {
                combined: score,
                ..ScoreBreakdown::default()
            },
        }
    }

    // Tests entries are sorted by score descending and truncated to top_k
    // Verified by sorting ascending
    #[test]
    fn test_ranking_and_truncation() {
        let table = AdjacencyTable::from_entries(
            4,
            2,
            vec![
                entry(0, Border::Right, 1, Rotation::R0, 0.2),
                entry(0, Border::Right, 2, Rotation::R0, 0.9),
                entry(0, Border::Right, 3, Rotation::R0, 0.5),
            ],
        )
        .unwrap();

        let ranked: Vec<_> = table.entries(TileId(0), Border::Right).iter().map(|e| e.tile_b).collect();
        assert_eq!(ranked, vec![TileId(2), TileId(3)]);
        assert_eq!(table.len(), 2);
        assert!(table.entries(TileId(0), Border::Left).is_empty());
    }

    // Tests equal scores rank by lower candidate tile, then lower rotation
    // Verified by preferring the higher tile id on ties
    #[test]
    fn test_tie_breaks() {
        let table = AdjacencyTable::from_entries(
            4,
            10,
            vec![
                entry(0, Border::Top, 3, Rotation::R0, 0.5),
                entry(0, Border::Top, 1, Rotation::R180, 0.5),
                entry(0, Border::Top, 1, Rotation::R90, 0.5),
                entry(0, Border::Top, 2, Rotation::R0, 0.7),
            ],
        )
        .unwrap();

        let order: Vec<_> = table
            .entries(TileId(0), Border::Top)
            .iter()
            .map(|e| (e.tile_b.index(), e.rotation))
            .collect();
        assert_eq!(
            order,
            vec![(2, Rotation::R0), (1, Rotation::R90), (1, Rotation::R180), (3, Rotation::R0)]
        );
    }

    // Tests invalid construction parameters are rejected
    // Verified by accepting top_k of zero
    #[test]
    fn test_from_entries_validation() {
        assert!(matches!(
            AdjacencyTable::from_entries(2, 0, Vec::new()),
            Err(AlgorithmError::InvalidParameter { parameter: "top_k", .. })
        ));
        assert!(matches!(
            AdjacencyTable::from_entries(2, 1, vec![entry(0, Border::Top, 5, Rotation::R0, 0.1)]),
            Err(AlgorithmError::InvalidTileIndex { index: 5, .. })
        ));
        assert!(matches!(
            AdjacencyTable::from_entries(2, 1, vec![entry(1, Border::Top, 1, Rotation::R0, 0.1)]),
            Err(AlgorithmError::InvalidInput { .. })
        ));
    }

    // Tests best_match only considers the facing border and returns the top-ranked entry
    // Verified by ignoring the candidate border
    #[test]
    fn test_best_match_and_find() {
        let mut side = entry(0, Border::Right, 1, Rotation::R0, 0.95);
        side.border_b = Border::Top;
        let table = AdjacencyTable::from_entries(
            2,
            10,
            vec![
                side,
                entry(0, Border::Right, 1, Rotation::R90, 0.6),
                entry(0, Border::Right, 1, Rotation::R0, 0.4),
            ],
        )
        .unwrap();

        let best = table.best_match(TileId(0), Border::Right, TileId(1)).unwrap();
        assert_eq!(best.rotation, Rotation::R90);
        assert!(table.best_match(TileId(0), Border::Bottom, TileId(1)).is_none());

        let found = table
            .find(TileId(0), Border::Right, TileId(1), Border::Left, Rotation::R0)
            .unwrap();
        assert!((found.combined() - 0.4).abs() < 1e-12);
    }

    // Tests best_matches returns one entry per populated anchor
    // Verified by returning the last entry of each group
    #[test]
    fn test_best_matches() {
        let table = AdjacencyTable::from_entries(
            3,
            5,
            vec![
                entry(0, Border::Right, 1, Rotation::R0, 0.3),
                entry(0, Border::Right, 2, Rotation::R0, 0.8),
                entry(2, Border::Top, 0, Rotation::R0, 0.1),
            ],
        )
        .unwrap();

        let best = table.best_matches();
        assert_eq!(best.len(), 2);
        assert_eq!(best.first().map(|e| e.tile_b), Some(TileId(2)));
    }

    // Tests the heatmap averages kept entries per ordered pair with NaN on the diagonal
    // Verified by summing instead of averaging
    #[test]
    fn test_pair_heatmap() {
        let table = AdjacencyTable::from_entries(
            2,
            5,
            vec![
                entry(0, Border::Right, 1, Rotation::R0, 0.2),
                entry(0, Border::Bottom, 1, Rotation::R0, 0.6),
            ],
        )
        .unwrap();

        let heatmap = table.pair_heatmap();
        assert!(heatmap[[0, 0]].is_nan());
        assert!((heatmap[[0, 1]] - 0.4).abs() < 1e-12);
        assert!(heatmap[[1, 0]].abs() < f64::EPSILON);
    }

    // Tests the serialized table lists every entry with camelCase keys
    // Verified by serializing only the first group
    #[test]
    fn test_serialize() {
        let table = AdjacencyTable::from_entries(
            2,
            5,
            vec![
                entry(0, Border::Right, 1, Rotation::R90, 0.2),
                entry(1, Border::Left, 0, Rotation::R0, 0.6),
            ],
        )
        .unwrap();

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["topK"], 5);
        assert_eq!(json["entries"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["entries"][0]["borderA"], "right");
        assert_eq!(json["entries"][0]["rotation"], 90);
    }
}
