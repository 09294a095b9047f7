//! Tests for `TileBitset` membership and iteration

#[cfg(test)]
mod tests {
    use tilematch::algorithm::bitset::TileBitset;
    use tilematch::spatial::tiles::TileId;

    // Verifies new TileBitset is empty with count 0
    // Verified by initializing bitset with all bits set to 1
    #[test]
    fn test_new_bitset() {
        let bitset = TileBitset::new(10);
        assert_eq!(bitset.count(), 0);
        assert_eq!(bitset.capacity(), 10);
        assert!(!bitset.is_full());
    }

    // Tests insertion and containment checking, ignoring ids beyond capacity
    // Verified by removing the bounds check from insert
    #[test]
    fn test_insert_and_contains() {
        let mut bitset = TileBitset::new(4);
        bitset.insert(TileId(0));
        bitset.insert(TileId(3));
        bitset.insert(TileId(9));
        assert!(bitset.contains(TileId(0)));
        assert!(bitset.contains(TileId(3)));
        assert!(!bitset.contains(TileId(1)));
        assert!(!bitset.contains(TileId(9)));
        assert_eq!(bitset.count(), 2);
        assert_eq!(bitset.to_vec(), vec![TileId(0), TileId(3)]);
    }

    // Tests absent tiles are listed in ascending order until the set is full
    // Verified by iterating ones instead of zeros
    #[test]
    fn test_absent_and_full() {
        let mut bitset = TileBitset::new(3);
        bitset.insert(TileId(1));
        assert_eq!(bitset.absent().collect::<Vec<_>>(), vec![TileId(0), TileId(2)]);

        bitset.insert(TileId(0));
        bitset.insert(TileId(2));
        assert!(bitset.is_full());
        assert_eq!(bitset.absent().count(), 0);
        assert_eq!(bitset.to_string(), "TileBitset(3/3 tiles)");
    }
}
