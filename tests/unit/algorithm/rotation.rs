//! Tests for rotation choice strategies

#[cfg(test)]
mod tests {
    use tilematch::algorithm::greedy::Neighbor;
    use tilematch::algorithm::rotation::{FirstNeighbor, RotationPolicy, StrongestNeighbor};
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

    fn table() -> AdjacencyTable {
        AdjacencyTable::from_entries(
            3,
            10,
            vec![
                entry(0, Border::Bottom, 2, Rotation::R90, 0.4),
                entry(1, Border::Right, 2, Rotation::R180, 0.8),
            ],
        )
        .unwrap()
    }

    fn neighbors() -> Vec<Neighbor> {
        vec![
            Neighbor {
                tile: TileId(0),
                border: Border::Bottom,
            },
            Neighbor {
                tile: TileId(1),
                border: Border::Right,
            },
        ]
    }

    // Tests the first neighbour decides even when a later one scores higher
    // Verified by picking the highest-scoring neighbour
    #[test]
    fn test_first_neighbor() {
        assert_eq!(FirstNeighbor.rotation(&table(), TileId(2), &neighbors()), Rotation::R90);
    }

    // Tests the strongest neighbour decides across all neighbours
    // Verified by keeping the first entry found
    #[test]
    fn test_strongest_neighbor() {
        assert_eq!(StrongestNeighbor.rotation(&table(), TileId(2), &neighbors()), Rotation::R180);
    }

    // Tests both policies fall back to upright without entries
    // Verified by returning the rotation of any entry of the neighbour
    #[test]
    fn test_fallback_upright() {
        let reversed: Vec<_> = neighbors().into_iter().rev().collect();
        assert_eq!(FirstNeighbor.rotation(&table(), TileId(0), &reversed), Rotation::R0);
        assert_eq!(StrongestNeighbor.rotation(&table(), TileId(0), &neighbors()), Rotation::R0);
        assert_eq!(FirstNeighbor.rotation(&table(), TileId(2), &[]), Rotation::R0);
    }
}
