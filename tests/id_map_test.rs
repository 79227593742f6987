//! End-to-end coverage of id mapping: ingestion, bijection, label
//! membership, batching, and filtered views.

use graphmem::concurrency::Concurrency;
use graphmem::core::loading::{LabelInformation, LoadingError, NodesBuilder};
use graphmem::types::id_map::{ArrayIdMap, IdMap, NOT_FOUND};
use graphmem::types::schema::NodeLabel;
use std::collections::HashSet;
use std::sync::Arc;

fn label(name: &str) -> NodeLabel {
    NodeLabel::of(name)
}

fn labels(names: &[&str]) -> HashSet<NodeLabel> {
    names.iter().map(|n| NodeLabel::of(*n)).collect()
}

fn build_map(originals: &[i64], node_labels: &[NodeLabel]) -> Arc<ArrayIdMap> {
    let builder = NodesBuilder::new(originals.len().max(1), Concurrency::of(4)).unwrap();
    for &original in originals {
        builder.add_node(original, node_labels).unwrap();
    }
    Arc::new(builder.build(None, Concurrency::of(4)).unwrap().id_map)
}

#[test]
fn tiny_graph_end_to_end() {
    let id_map = build_map(&[10, 20, 30, 40], &[label("A")]);

    assert_eq!(id_map.node_count(), 4);
    assert_eq!(id_map.to_mapped_node_id(30), 2);
    assert_eq!(id_map.to_original_node_id(2), 30);
    assert!(!id_map.contains_original_id(25));
    assert_eq!(id_map.iter_nodes().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    assert_eq!(id_map.highest_original_id(), 40);
    assert_eq!(id_map.node_count_for_label(&label("A")), 4);
}

#[test]
fn bijection_holds_for_sparse_ids() {
    let originals: Vec<i64> = (0..500).map(|i| i * 7919 + 13).collect();
    let id_map = build_map(&originals, &[]);

    // Forward then backward is the identity on ingested originals.
    for &original in &originals {
        let mapped = id_map.to_mapped_node_id(original);
        assert!(mapped >= 0);
        assert_eq!(id_map.to_original_node_id(mapped as u64), original);
    }
    // Backward then forward is the identity on the internal domain.
    for internal in 0..id_map.node_count() as u64 {
        let original = id_map.to_original_node_id(internal);
        assert_eq!(id_map.to_mapped_node_id(original), internal as i64);
    }
}

#[test]
fn ingestion_is_idempotent() {
    let builder = NodesBuilder::new(8, Concurrency::of(1)).unwrap();
    let first = builder.add_node(1234, &[label("A")]).unwrap();
    let again = builder.add_node(1234, &[label("A")]).unwrap();
    assert_eq!(first, again);

    let built = builder.build(None, Concurrency::of(1)).unwrap();
    assert_eq!(built.id_map.node_count(), 1);
}

#[test]
fn negative_original_id_is_rejected() {
    let builder = NodesBuilder::new(2, Concurrency::of(1)).unwrap();
    assert!(matches!(
        builder.add_node(-1, &[]).unwrap_err(),
        LoadingError::NegativeId { id: -1 }
    ));
}

#[test]
fn iteration_covers_every_node_exactly_once() {
    let originals: Vec<i64> = (0..1000).map(|i| i * 3 + 1).collect();
    let id_map = build_map(&originals, &[label("X")]);

    let seen: Vec<u64> = id_map.iter_nodes().collect();
    assert_eq!(seen.len(), id_map.node_count());
    let distinct: HashSet<u64> = seen.iter().copied().collect();
    assert_eq!(distinct.len(), seen.len());

    // Restartable: a second iteration yields the same sequence.
    assert_eq!(id_map.iter_nodes().collect::<Vec<_>>(), seen);
}

#[test]
fn unknown_label_counts_zero() {
    let id_map = build_map(&[1, 2, 3], &[label("A")]);
    assert_eq!(id_map.node_count_for_label(&label("Nope")), 0);
    assert_eq!(
        id_map.node_count_for_label(&NodeLabel::all_nodes()),
        id_map.node_count()
    );
}

#[test]
fn batch_iterables_partition_the_domain() {
    let id_map = build_map(&(0..103).collect::<Vec<i64>>(), &[]);
    let batches = id_map.batch_iterables(10);

    assert_eq!(batches.len(), 11);
    let mut expected_start = 0u64;
    let mut total = 0usize;
    for batch in &batches {
        assert_eq!(batch.start, expected_start);
        expected_start += batch.length as u64;
        total += batch.length;
    }
    assert_eq!(total, 103);
    assert_eq!(batches.last().unwrap().length, 3);
}

#[test]
fn label_union_counts() {
    // Labels A on even internal ids, B on multiples of 5.
    let builder = NodesBuilder::new(1000, Concurrency::of(4)).unwrap();
    for original in 0..1000i64 {
        let mut node_labels = Vec::new();
        if original % 2 == 0 {
            node_labels.push(label("A"));
        }
        if original % 5 == 0 {
            node_labels.push(label("B"));
        }
        builder.add_node(original, &node_labels).unwrap();
    }
    let id_map = Arc::new(builder.build(None, Concurrency::of(4)).unwrap().id_map);

    assert_eq!(id_map.node_count_for_label(&label("A")), 500);
    assert_eq!(id_map.node_count_for_label(&label("B")), 200);

    let union = id_map
        .label_information()
        .union_bit_set(&labels(&["A", "B"]), id_map.node_count());
    assert_eq!(union.cardinality(), 600);

    let single = id_map
        .label_information()
        .union_bit_set(&labels(&["B"]), id_map.node_count());
    assert_eq!(
        single.cardinality(),
        id_map.node_count_for_label(&label("B"))
    );
}

#[test]
fn filtered_maps_by_label() {
    let builder = NodesBuilder::new(1000, Concurrency::of(4)).unwrap();
    for original in 0..1000i64 {
        let mut node_labels = Vec::new();
        if original % 2 == 0 {
            node_labels.push(label("A"));
        }
        if original % 5 == 0 {
            node_labels.push(label("B"));
        }
        builder.add_node(original, &node_labels).unwrap();
    }
    let id_map = Arc::new(builder.build(None, Concurrency::of(4)).unwrap().id_map);

    let filtered_a = id_map
        .with_filtered_labels(&labels(&["A"]), Concurrency::of(2))
        .unwrap()
        .unwrap();
    assert_eq!(filtered_a.node_count(), 500);

    let filtered_b = id_map
        .with_filtered_labels(&labels(&["B"]), Concurrency::of(2))
        .unwrap()
        .unwrap();
    assert_eq!(filtered_b.node_count(), 200);

    let filtered_ab = id_map
        .with_filtered_labels(&labels(&["A", "B"]), Concurrency::of(2))
        .unwrap()
        .unwrap();
    assert_eq!(filtered_ab.node_count(), 600);
}

#[test]
fn filtered_map_translations_compose() {
    let builder = NodesBuilder::new(100, Concurrency::of(2)).unwrap();
    for original in 0..100i64 {
        let node_labels = if original % 3 == 0 {
            vec![label("T")]
        } else {
            vec![]
        };
        builder.add_node(original * 10, &node_labels).unwrap();
    }
    let id_map = Arc::new(builder.build(None, Concurrency::of(2)).unwrap().id_map);

    let filtered = id_map
        .with_filtered_labels(&labels(&["T"]), Concurrency::of(2))
        .unwrap()
        .unwrap();
    assert_eq!(filtered.node_count(), 34);

    for filtered_id in 0..filtered.node_count() as u64 {
        let original = filtered.to_original_node_id(filtered_id);
        // Both translations compose through the root map.
        assert_eq!(filtered.to_mapped_node_id(original), filtered_id as i64);
        let root_id = filtered.to_root_node_id(filtered_id);
        assert_eq!(id_map.to_original_node_id(root_id), original);
        assert!(filtered.contains_root_node_id(root_id));
        assert!(filtered.has_label(filtered_id, &label("T")));
    }

    // Nodes outside the filter translate to the sentinel.
    assert_eq!(filtered.to_mapped_node_id(10), NOT_FOUND);
    assert_eq!(filtered.to_filtered_node_id(1), NOT_FOUND);
}

#[test]
fn filtered_map_with_unknown_label_fails() {
    let id_map = build_map(&[1, 2, 3], &[label("A")]);
    let err = id_map
        .with_filtered_labels(&labels(&["A", "Ghost"]), Concurrency::of(1))
        .unwrap_err();
    match err {
        LoadingError::UnknownLabels { missing, available } => {
            assert_eq!(missing, vec!["Ghost".to_string()]);
            assert_eq!(available, vec!["A".to_string()]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn filtered_map_over_empty_union_is_absent() {
    use graphmem::core::loading::{ArrayIdMapBuilder, LabelInformationBuilder};

    // A committed single-label builder makes the label known even when no
    // node ever carried it.
    let builder = ArrayIdMapBuilder::new(2);
    builder.allocate(2).insert(&[5, 9]);
    let label_builder = LabelInformationBuilder::single(label("Ghosted"), 2);
    let id_map = Arc::new(
        builder
            .build(label_builder, None, Concurrency::of(1))
            .unwrap(),
    );

    let filtered = id_map
        .with_filtered_labels(&labels(&["Ghosted"]), Concurrency::of(1))
        .unwrap();
    assert!(filtered.is_none());
}

#[test]
fn filtered_map_over_single_member_label() {
    let builder = NodesBuilder::new(4, Concurrency::of(1)).unwrap();
    builder.add_node(0, &[label("A")]).unwrap();
    builder.add_node(1, &[]).unwrap();
    let id_map = Arc::new(builder.build(None, Concurrency::of(1)).unwrap().id_map);

    let filtered = id_map
        .with_filtered_labels(&labels(&["A"]), Concurrency::of(1))
        .unwrap();
    assert_eq!(filtered.unwrap().node_count(), 1);
}

#[test]
fn label_filter_composition_matches_intersection() {
    let builder = NodesBuilder::new(300, Concurrency::of(2)).unwrap();
    for original in 0..300i64 {
        let mut node_labels = Vec::new();
        if original % 2 == 0 {
            node_labels.push(label("A"));
        }
        if original % 3 == 0 {
            node_labels.push(label("B"));
        }
        builder.add_node(original, &node_labels).unwrap();
    }
    let id_map = Arc::new(builder.build(None, Concurrency::of(2)).unwrap().id_map);
    let info = id_map.label_information();

    // Filtering to {A, B} then to {B} is filtering to {B} directly.
    let chained = info.filter(&labels(&["A", "B"]));
    let chained = chained.filter(&labels(&["B"]));
    let direct = info.filter(&labels(&["B"]));

    let n = id_map.node_count();
    for node in 0..n as u64 {
        assert_eq!(
            chained.has_label(node, &label("B")),
            direct.has_label(node, &label("B"))
        );
        assert!(!chained.has_label(node, &label("A")));
    }
    assert_eq!(
        chained.node_count_for_label(&label("B")),
        direct.node_count_for_label(&label("B"))
    );
}

#[test]
fn bijection_under_seeded_random_ids() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);

    let mut originals: HashSet<i64> = HashSet::new();
    while originals.len() < 2000 {
        originals.insert(rng.gen_range(0..1_000_000_000));
    }
    let originals: Vec<i64> = originals.into_iter().collect();
    let id_map = build_map(&originals, &[]);

    assert_eq!(id_map.node_count(), 2000);
    for &original in &originals {
        let mapped = id_map.to_mapped_node_id(original);
        assert!(mapped >= 0);
        assert_eq!(id_map.to_original_node_id(mapped as u64), original);
    }
    // A handful of ids that were never ingested miss cleanly.
    for _ in 0..100 {
        let probe = rng.gen_range(1_000_000_000..2_000_000_000);
        assert_eq!(id_map.to_mapped_node_id(probe), NOT_FOUND);
        assert!(!id_map.contains_original_id(probe));
    }
}

#[test]
fn iteration_with_labels_is_ascending_union() {
    let builder = NodesBuilder::new(50, Concurrency::of(1)).unwrap();
    for original in 0..50i64 {
        let node_labels = match original % 3 {
            0 => vec![label("A")],
            1 => vec![label("B")],
            _ => vec![],
        };
        builder.add_node(original, &node_labels).unwrap();
    }
    let id_map = Arc::new(builder.build(None, Concurrency::of(1)).unwrap().id_map);

    let ids: Vec<u64> = id_map.iter_nodes_with_labels(&labels(&["A", "B"])).collect();
    let expected: Vec<u64> = (0..50u64).filter(|i| i % 3 != 2).collect();
    assert_eq!(ids, expected);
}
