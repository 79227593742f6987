//! Paired traversal of targets and one property column.
//!
//! Wraps an [`AdjacencyCursor`] and a [`PropertyCursor`] positioned at the
//! same source, yielding the i-th target together with the i-th property
//! value. The pairing holds by construction: both cursors walk the same
//! edge ordinals.

use crate::types::adj_list::{AdjacencyCursor, PropertyCursor};

/// A target id together with its raw 64-bit property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedTarget {
    pub target: i64,
    pub weight_bits: i64,
}

impl WeightedTarget {
    /// The property value read as a double.
    pub fn weight_as_double(&self) -> f64 {
        f64::from_bits(self.weight_bits as u64)
    }
}

/// Cursor over (target, property value) pairs of one source.
#[derive(Clone)]
pub struct WeightedAdjacencyCursor<'a> {
    targets: AdjacencyCursor<'a>,
    weights: PropertyCursor<'a>,
}

impl<'a> WeightedAdjacencyCursor<'a> {
    /// Pairs two cursors positioned at the start of the same source.
    pub fn new(targets: AdjacencyCursor<'a>, weights: PropertyCursor<'a>) -> Self {
        Self { targets, weights }
    }

    /// Number of pairs not yet consumed.
    pub fn remaining(&self) -> usize {
        self.targets.remaining()
    }

    /// The next pair.
    ///
    /// Same precondition as [`AdjacencyCursor::next`]: calling this when
    /// `remaining() == 0` is undefined behavior.
    pub fn next(&mut self) -> WeightedTarget {
        WeightedTarget {
            target: self.targets.next(),
            weight_bits: self.weights.next_value(),
        }
    }

    /// Replaces this cursor's state wholesale with another cursor's.
    pub fn copy_from(&mut self, other: &WeightedAdjacencyCursor<'a>) {
        self.targets.copy_from(&other.targets);
        self.weights.copy_from(&other.weights);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compress::AdjacencyCompressor;
    use crate::types::adj_list::AdjacencyList;

    #[test]
    fn test_paired_iteration() {
        let compressor = AdjacencyCompressor::new(1, 1);
        compressor
            .add_with_properties(0, &[10, 20, 30], &[&[1, 2, 3]], 3)
            .unwrap();
        let (list, properties) = AdjacencyList::from_compressor(&compressor, 1).unwrap();

        let mut cursor = WeightedAdjacencyCursor::new(
            list.adjacency_cursor(0),
            properties[0].property_cursor(0),
        );
        let mut pairs = Vec::new();
        while cursor.remaining() > 0 {
            let pair = cursor.next();
            pairs.push((pair.target, pair.weight_bits));
        }
        assert_eq!(pairs, vec![(10, 1), (20, 2), (30, 3)]);
    }

    #[test]
    fn test_pairing_survives_drain_sort() {
        let compressor = AdjacencyCompressor::new(1, 1);
        compressor
            .add_with_properties(0, &[30, 10, 20], &[&[3, 1, 2]], 3)
            .unwrap();
        let (list, properties) = AdjacencyList::from_compressor(&compressor, 1).unwrap();

        let mut cursor = WeightedAdjacencyCursor::new(
            list.adjacency_cursor(0),
            properties[0].property_cursor(0),
        );
        while cursor.remaining() > 0 {
            let pair = cursor.next();
            assert_eq!(pair.target / 10, pair.weight_bits);
        }
    }

    #[test]
    fn test_double_weights() {
        let compressor = AdjacencyCompressor::new(1, 1);
        let bits = [0.5f64.to_bits() as i64];
        compressor
            .add_with_properties(0, &[7], &[&bits], 1)
            .unwrap();
        let (list, properties) = AdjacencyList::from_compressor(&compressor, 1).unwrap();

        let mut cursor = WeightedAdjacencyCursor::new(
            list.adjacency_cursor(0),
            properties[0].property_cursor(0),
        );
        let pair = cursor.next();
        assert_eq!(pair.weight_as_double(), 0.5);
    }

    #[test]
    fn test_empty_source() {
        let compressor = AdjacencyCompressor::new(2, 1);
        compressor
            .add_with_properties(1, &[5], &[&[9]], 1)
            .unwrap();
        let (list, properties) = AdjacencyList::from_compressor(&compressor, 2).unwrap();

        let cursor = WeightedAdjacencyCursor::new(
            list.adjacency_cursor(0),
            properties[0].property_cursor(0),
        );
        assert_eq!(cursor.remaining(), 0);
    }
}
