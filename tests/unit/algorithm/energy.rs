//! Tests for grid energy and its local recomputation

#[cfg(test)]
mod tests {
    use tilematch::algorithm::energy::{grid_energy, local_energy, pair_energy};
    use tilematch::algorithm::scorer::ScoreBreakdown;
    use tilematch::algorithm::table::{AdjacencyEntry, AdjacencyTable};
    use tilematch::io::configuration::UNMATCHED_PAIR_PENALTY;
    use tilematch::spatial::grid::{Grid, PlacedTile};
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

    fn placed(tile: usize, rotation: Rotation) -> PlacedTile {
        PlacedTile::new(TileId(tile), rotation)
    }

    // Tests a scored pair costs its negated score at the far tile's rotation
    // Verified by looking up the near tile's rotation
    #[test]
    fn test_pair_energy() {
        let table =
            AdjacencyTable::from_entries(2, 4, vec![entry(0, Border::Right, 1, Rotation::R90, 0.8)]).unwrap();

        let matched = pair_energy(&table, placed(0, Rotation::R180), Border::Right, placed(1, Rotation::R90));
        assert!((matched + 0.8).abs() < 1e-12);

        let unmatched = pair_energy(&table, placed(0, Rotation::R90), Border::Right, placed(1, Rotation::R0));
        assert!((unmatched - UNMATCHED_PAIR_PENALTY).abs() < 1e-12);
    }

    // Tests horizontal and vertical pairs are both counted and empty cells cost nothing
    // Verified by skipping vertical edges
    #[test]
    fn test_grid_energy() {
        let table = AdjacencyTable::from_entries(
            3,
            4,
            vec![
                entry(0, Border::Right, 1, Rotation::R0, 0.5),
                entry(0, Border::Bottom, 2, Rotation::R0, 0.25),
            ],
        )
        .unwrap();

        let mut grid = Grid::new(2);
        grid.place(0, 0, placed(0, Rotation::R0));
        grid.place(0, 1, placed(1, Rotation::R0));
        grid.place(1, 0, placed(2, Rotation::R0));

        assert!((grid_energy(&grid, &table) + 0.75).abs() < 1e-12);
        assert!(grid_energy(&Grid::new(3), &table).abs() < 1e-12);
    }

    // Tests the local energy change of a swap equals the full energy change
    // Verified by omitting the edges to the left and above a moved cell
    #[test]
    fn test_local_energy_matches_full_delta() {
        let entries = (0..9)
            .flat_map(|a| {
                (0..9).filter(move |&b| a != b).flat_map(move |b| {
                    [Border::Right, Border::Bottom].into_iter().map(move |border| {
                        let score = ((a * 7 + b * 3 + border.index()) % 11) as f64 / 11.0;
                        entry(a, border, b, Rotation::R0, score)
                    })
                })
            })
            .collect::<Vec<_>>();
        let table = AdjacencyTable::from_entries(9, 100, entries).unwrap();

        let mut grid = Grid::new(3);
        for cell in 0..9 {
            grid.place(cell / 3, cell % 3, placed(cell, Rotation::R0));
        }

        for (a, b) in [((0, 0), (0, 1)), ((1, 1), (2, 2)), ((0, 2), (2, 0)), ((1, 0), (1, 1))] {
            let full_before = grid_energy(&grid, &table);
            let local_before = local_energy(&grid, &table, &[a, b]);
            grid.swap(a, b);
            let full_delta = grid_energy(&grid, &table) - full_before;
            let local_delta = local_energy(&grid, &table, &[a, b]) - local_before;
            assert!((full_delta - local_delta).abs() < 1e-9);
        }
    }

    // Tests a rotation change is reflected in the local energy of the cell
    // Verified by ignoring the rotation of the far tile
    #[test]
    fn test_local_energy_rotation() {
        let table =
            AdjacencyTable::from_entries(2, 4, vec![entry(0, Border::Right, 1, Rotation::R270, 0.6)]).unwrap();
        let mut grid = Grid::new(2);
        grid.place(0, 0, placed(0, Rotation::R0));
        grid.place(0, 1, placed(1, Rotation::R0));

        let before = local_energy(&grid, &table, &[(0, 1)]);
        grid.set_rotation(0, 1, Rotation::R270);
        let after = local_energy(&grid, &table, &[(0, 1)]);

        assert!((before - UNMATCHED_PAIR_PENALTY).abs() < 1e-12);
        assert!((after + 0.6).abs() < 1e-12);
    }
}
