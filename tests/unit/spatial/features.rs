//! Tests for border feature sets, rotation expansion and catalog validation

#[cfg(test)]
mod tests {
    use tilematch::AlgorithmError;
    use tilematch::spatial::features::{BorderFeatureSet, FeatureLookup, TileCatalog, TileFeatures};
    use tilematch::spatial::tiles::{Border, PerBorder, Rotation, TileId};

    fn tile_with_color_bins(id: usize, bins: usize) -> TileFeatures {
        let borders = PerBorder::from_fn(|border| {
            let mut histogram = vec![0.0; bins];
            if let Some(bin) = histogram.get_mut(border.index() % bins) {
                *bin = 1.0;
            }
            BorderFeatureSet::new(histogram, vec![border.index() as f64])
        });
        TileFeatures::from_unrotated(TileId(id), &borders)
    }

    // Tests rotated views reuse the border that moves into place
    // Verified by using the unrotated border for every rotation
    #[test]
    fn test_from_unrotated_permutes_borders() {
        let features = tile_with_color_bins(0, 4);
        let top_after_quarter_turn = features.border(Rotation::R90, Border::Top);
        assert_eq!(top_after_quarter_turn.texture(), Some(&[3.0][..]));
        let right_after_half_turn = features.border(Rotation::R180, Border::Right);
        assert_eq!(right_after_half_turn.texture(), Some(&[3.0][..]));
        assert_eq!(features.slots().count(), 16);
    }

    // Tests the catalog sorts tiles and serves lookups by id
    // Verified by indexing tiles in input order
    #[test]
    fn test_catalog_orders_tiles() {
        let catalog =
            TileCatalog::new(vec![tile_with_color_bins(1, 4), tile_with_color_bins(0, 4)]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.tiles().first().map(|tile| tile.tile), Some(TileId(0)));
        assert_eq!(catalog.shape().color, Some(4));
        assert!(catalog.border_features(TileId(1), Rotation::R0, Border::Top).is_some());
        assert!(catalog.border_features(TileId(2), Rotation::R0, Border::Top).is_none());
    }

    // Tests gaps in tile ids are rejected
    // Verified by accepting any unique ids
    #[test]
    fn test_catalog_rejects_id_gap() {
        let result = TileCatalog::new(vec![tile_with_color_bins(0, 4), tile_with_color_bins(2, 4)]);
        assert!(matches!(result, Err(AlgorithmError::InvalidInput { .. })));
    }

    // Tests vectors of one modality must share a length across tiles
    // Verified by only checking the first tile's shape
    #[test]
    fn test_catalog_rejects_shape_mismatch() {
        let result = TileCatalog::new(vec![tile_with_color_bins(0, 4), tile_with_color_bins(1, 8)]);
        assert!(matches!(result, Err(AlgorithmError::InvalidInput { .. })));

        let deep_a = BorderFeatureSet::default().with_deep_layer("layer", vec![1.0, 2.0]);
        let deep_b = BorderFeatureSet::default().with_deep_layer("layer", vec![1.0]);
        let result = TileCatalog::new(vec![
            TileFeatures::from_unrotated(TileId(0), &PerBorder::from_fn(|_| deep_a.clone())),
            TileFeatures::from_unrotated(TileId(1), &PerBorder::from_fn(|_| deep_b.clone())),
        ]);
        assert!(matches!(result, Err(AlgorithmError::InvalidInput { .. })));
    }

    // Tests missing modalities are allowed and leave the shape unset
    // Verified by requiring every modality on every border
    #[test]
    fn test_missing_modalities_allowed() {
        let empty = TileFeatures::from_unrotated(TileId(0), &PerBorder::default());
        let catalog = TileCatalog::new(vec![empty]).unwrap();
        assert_eq!(catalog.shape().color, None);
        assert!(catalog.shape().deep.is_empty());
    }
}
