//! Compression round trips and cursor traversal against the compressed
//! adjacency storage.

use graphmem::core::compress::{AdjacencyCompressor, IGNORE_VALUE};
use graphmem::types::adj_list::AdjacencyList;
use graphmem::types::id_map::NOT_FOUND;
use proptest::prelude::*;

/// Compress a single source's targets and freeze into a list.
fn list_of(targets: &[i64]) -> AdjacencyList {
    let compressor = AdjacencyCompressor::new(1, 0);
    compressor.add(0, targets, targets.len()).unwrap();
    let (list, _) = AdjacencyList::from_compressor(&compressor, 1).unwrap();
    list
}

/// Compress with chunked appends to exercise buffer growth paths.
fn list_of_chunked(targets: &[i64], chunk: usize) -> AdjacencyList {
    let compressor = AdjacencyCompressor::new(1, 0);
    for piece in targets.chunks(chunk.max(1)) {
        compressor.add(0, piece, piece.len()).unwrap();
    }
    let (list, _) = AdjacencyList::from_compressor(&compressor, 1).unwrap();
    list
}

fn decode_all(list: &AdjacencyList) -> Vec<i64> {
    let degree = list.degree(0);
    let mut cursor = list.adjacency_cursor(0);
    (0..degree).map(|_| cursor.next()).collect()
}

#[test]
fn delta_zigzag_round_trip() {
    let targets = vec![1, 3, 3, 7, 1000, 1001, 1_000_000];
    let list = list_of(&targets);
    assert_eq!(decode_all(&list), targets);
}

#[test]
fn block_boundary_at_130_targets() {
    let targets: Vec<i64> = (0..130).collect();
    let list = list_of(&targets);
    assert_eq!(decode_all(&list), targets);

    let mut cursor = list.adjacency_cursor(0);
    let (value, consumed) = cursor.advance(100);
    assert_eq!(value, 100);
    assert_eq!(consumed, 101);

    let mut cursor = list.adjacency_cursor(0);
    let (value, consumed) = cursor.advance(130);
    assert_eq!(value, NOT_FOUND);
    assert_eq!(consumed, 130);
}

#[test]
fn skip_until_is_strictly_greater() {
    let list = list_of(&[5, 10, 15, 20]);

    let mut cursor = list.adjacency_cursor(0);
    let (value, consumed) = cursor.skip_until(10);
    assert_eq!(value, 15);
    assert_eq!(consumed, 3);

    let mut cursor = list.adjacency_cursor(0);
    let (value, consumed) = cursor.skip_until(20);
    assert_eq!(value, NOT_FOUND);
    assert_eq!(consumed, 4);
}

#[test]
fn cursor_yields_non_decreasing_sequence() {
    let targets: Vec<i64> = vec![2, 2, 5, 9, 9, 9, 100, 4000];
    let list = list_of(&targets);
    let decoded = decode_all(&list);
    for pair in decoded.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
    assert_eq!(decoded, targets);
}

#[test]
fn unsorted_and_chunked_appends_decode_sorted() {
    let compressor = AdjacencyCompressor::new(2, 0);
    compressor.add(0, &[900, 30], 2).unwrap();
    compressor.add(0, &[500, 1], 2).unwrap();
    compressor.add(1, &[4], 1).unwrap();
    let (list, _) = AdjacencyList::from_compressor(&compressor, 2).unwrap();

    let mut cursor = list.adjacency_cursor(0);
    let decoded: Vec<i64> = (0..4).map(|_| cursor.next()).collect();
    assert_eq!(decoded, vec![1, 30, 500, 900]);
    assert_eq!(list.degree(1), 1);
}

#[test]
fn ignore_values_are_skipped_in_stream_and_columns() {
    let compressor = AdjacencyCompressor::new(1, 1);
    let targets = [3i64, IGNORE_VALUE, 9, 27, IGNORE_VALUE];
    let weights = [1i64, 0, 2, 3, 0];
    compressor
        .add_with_properties(0, &targets, &[&weights], 3)
        .unwrap();
    let (list, properties) = AdjacencyList::from_compressor(&compressor, 1).unwrap();

    assert_eq!(list.degree(0), 3);
    assert_eq!(decode_all(&list), vec![3, 9, 27]);

    let mut cursor = properties[0].property_cursor(0);
    let mut values = Vec::new();
    while cursor.has_next() {
        values.push(cursor.next_value());
    }
    assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn property_columns_align_with_targets() {
    let compressor = AdjacencyCompressor::new(1, 2);
    // Unsorted on purpose: columns must follow the targets through the sort.
    let targets = [40i64, 10, 30, 20];
    let weight = [4i64, 1, 3, 2];
    let since = [2004i64, 2001, 2003, 2002];
    compressor
        .add_with_properties(0, &targets, &[&weight, &since], 4)
        .unwrap();
    let (list, properties) = AdjacencyList::from_compressor(&compressor, 1).unwrap();

    assert_eq!(decode_all(&list), vec![10, 20, 30, 40]);

    let degree = list.degree(0);
    let mut adjacency = list.adjacency_cursor(0);
    let mut weights = properties[0].property_cursor(0);
    let mut years = properties[1].property_cursor(0);
    for _ in 0..degree {
        let target = adjacency.next();
        assert_eq!(weights.next_value() * 10, target);
        assert_eq!(years.next_value() - 2000, target / 10);
    }
    assert!(!weights.has_next());
    assert!(!years.has_next());
}

#[test]
fn peek_matches_next_across_blocks() {
    let targets: Vec<i64> = (0..200).map(|i| i * i) .collect();
    let list = list_of(&targets);
    let mut cursor = list.adjacency_cursor(0);
    for _ in 0..targets.len() {
        let peeked = cursor.peek();
        assert_eq!(cursor.next(), peeked);
    }
}

proptest! {
    /// Encoding then decoding reproduces any ascending sequence under any
    /// chunking.
    #[test]
    fn prop_round_trip_any_chunking(
        mut targets in proptest::collection::vec(0i64..10_000_000, 1..400),
        chunk in 1usize..64,
    ) {
        targets.sort();
        let list = list_of_chunked(&targets, chunk);
        prop_assert_eq!(decode_all(&list), targets);
    }

    /// `advance(q)` returns the first element `>= q` and consumed equals its
    /// index plus one.
    #[test]
    fn prop_advance_matches_linear_scan(
        mut targets in proptest::collection::vec(0i64..100_000, 1..300),
        query in 0i64..110_000,
    ) {
        targets.sort();
        let list = list_of(&targets);
        let mut cursor = list.adjacency_cursor(0);
        let (value, consumed) = cursor.advance(query);

        match targets.iter().position(|&t| t >= query) {
            Some(index) => {
                prop_assert_eq!(value, targets[index]);
                prop_assert_eq!(consumed, index + 1);
            }
            None => {
                prop_assert_eq!(value, NOT_FOUND);
                prop_assert_eq!(consumed, targets.len());
            }
        }
    }

    /// `skip_until(q)` returns the first element `> q`, same consumed rule.
    #[test]
    fn prop_skip_until_matches_linear_scan(
        mut targets in proptest::collection::vec(0i64..100_000, 1..300),
        query in 0i64..110_000,
    ) {
        targets.sort();
        let list = list_of(&targets);
        let mut cursor = list.adjacency_cursor(0);
        let (value, consumed) = cursor.skip_until(query);

        match targets.iter().position(|&t| t > query) {
            Some(index) => {
                prop_assert_eq!(value, targets[index]);
                prop_assert_eq!(consumed, index + 1);
            }
            None => {
                prop_assert_eq!(value, NOT_FOUND);
                prop_assert_eq!(consumed, targets.len());
            }
        }
    }

    /// `advance_by(k)` lands on the element at relative index `k`.
    #[test]
    fn prop_advance_by(
        mut targets in proptest::collection::vec(0i64..100_000, 2..300),
        k_seed in 0usize..1000,
    ) {
        targets.sort();
        let k = k_seed % targets.len();
        let list = list_of(&targets);
        let mut cursor = list.adjacency_cursor(0);
        let (value, consumed) = cursor.advance_by(k);
        prop_assert_eq!(value, targets[k]);
        prop_assert_eq!(consumed, k + 1);
        prop_assert_eq!(cursor.remaining(), targets.len() - k - 1);
    }

    /// Unsorted input drains to the sorted sequence.
    #[test]
    fn prop_unsorted_input_is_sorted_on_drain(
        targets in proptest::collection::vec(0i64..1_000_000, 1..200),
    ) {
        let list = list_of(&targets);
        let mut expected = targets.clone();
        expected.sort();
        prop_assert_eq!(decode_all(&list), expected);
    }
}
