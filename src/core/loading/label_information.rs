//! Per-label node membership.
//!
//! Two storage strategies, chosen adaptively. When only one label is ever in
//! play the membership is a single bitset. The first insert of a different
//! label upgrades the builder to a label→bitset map; the upgrade is one-way
//! and the old set becomes one entry of the map.
//!
//! During concurrent load membership lives in atomic growing bitsets. On
//! finalize those freeze into plain bitsets sized to the final node count,
//! with every import-time id pushed through a caller-provided remapping.

use crate::collections::{BitSet, HugeAtomicBitSet};
use crate::core::loading::{LoadingError, LoadingResult};
use crate::types::id_map::MappedNodeId;
use crate::types::schema::NodeLabel;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Frozen label membership: containment, counts, unions, iteration.
pub trait LabelInformation: Send + Sync {
    /// True when no label has any members.
    fn is_empty(&self) -> bool;

    /// The labels with stored membership.
    fn available_node_labels(&self) -> HashSet<NodeLabel>;

    /// Member count of one label. The universal label counts every node;
    /// unknown labels count zero.
    fn node_count_for_label(&self, label: &NodeLabel) -> usize;

    /// Bit lookup; the universal label is always a member.
    fn has_label(&self, node_id: MappedNodeId, label: &NodeLabel) -> bool;

    /// Bitwise OR of the requested labels' bitsets, sized to `node_count`.
    fn union_bit_set(&self, labels: &HashSet<NodeLabel>, node_count: usize) -> BitSet;

    /// New label information restricted to the intersection of stored and
    /// requested labels.
    fn filter(&self, labels: &HashSet<NodeLabel>) -> Box<dyn LabelInformation>;

    /// Ascending iteration over the union bitset of the requested labels.
    fn node_iterator(
        &self,
        labels: &HashSet<NodeLabel>,
        node_count: usize,
    ) -> Box<dyn Iterator<Item = MappedNodeId>>;

    /// Fails when any requested label has no stored membership.
    fn validate_node_labels(&self, labels: &HashSet<NodeLabel>) -> LoadingResult<()>;
}

fn unknown_labels_error(
    missing: Vec<&NodeLabel>,
    available: HashSet<NodeLabel>,
) -> LoadingError {
    let mut missing: Vec<String> = missing.iter().map(|l| l.name().to_string()).collect();
    missing.sort();
    let mut available: Vec<String> = available.iter().map(|l| l.name().to_string()).collect();
    available.sort();
    LoadingError::UnknownLabels { missing, available }
}

/// Membership of exactly one label.
#[derive(Clone)]
pub struct SingleLabelInformation {
    label: NodeLabel,
    bit_set: Arc<BitSet>,
    node_count: usize,
}

impl SingleLabelInformation {
    pub fn new(label: NodeLabel, bit_set: BitSet, node_count: usize) -> Self {
        Self {
            label,
            bit_set: Arc::new(bit_set),
            node_count,
        }
    }

    pub fn label(&self) -> &NodeLabel {
        &self.label
    }
}

impl LabelInformation for SingleLabelInformation {
    fn is_empty(&self) -> bool {
        self.bit_set.is_empty()
    }

    fn available_node_labels(&self) -> HashSet<NodeLabel> {
        [self.label.clone()].into_iter().collect()
    }

    fn node_count_for_label(&self, label: &NodeLabel) -> usize {
        if label.is_all_nodes() {
            self.node_count
        } else if label == &self.label {
            self.bit_set.cardinality()
        } else {
            0
        }
    }

    fn has_label(&self, node_id: MappedNodeId, label: &NodeLabel) -> bool {
        label.is_all_nodes() || (label == &self.label && self.bit_set.get(node_id as usize))
    }

    fn union_bit_set(&self, labels: &HashSet<NodeLabel>, node_count: usize) -> BitSet {
        let mut union = BitSet::new(node_count);
        if labels.iter().any(|l| l.is_all_nodes()) {
            union.set_range(0, node_count);
        } else if labels.contains(&self.label) {
            union.union_with(&self.bit_set);
        }
        union
    }

    fn filter(&self, labels: &HashSet<NodeLabel>) -> Box<dyn LabelInformation> {
        if labels.contains(&self.label) || labels.iter().any(|l| l.is_all_nodes()) {
            Box::new(self.clone())
        } else {
            Box::new(MultiLabelInformation::empty(self.node_count))
        }
    }

    fn node_iterator(
        &self,
        labels: &HashSet<NodeLabel>,
        node_count: usize,
    ) -> Box<dyn Iterator<Item = MappedNodeId>> {
        Box::new(
            self.union_bit_set(labels, node_count)
                .into_iter()
                .map(|id| id as MappedNodeId),
        )
    }

    fn validate_node_labels(&self, labels: &HashSet<NodeLabel>) -> LoadingResult<()> {
        let missing: Vec<&NodeLabel> = labels
            .iter()
            .filter(|l| !l.is_all_nodes() && *l != &self.label)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(unknown_labels_error(missing, self.available_node_labels()))
        }
    }
}

/// Membership stored as a label→bitset map.
#[derive(Clone)]
pub struct MultiLabelInformation {
    bit_sets: Arc<HashMap<NodeLabel, BitSet>>,
    node_count: usize,
}

impl MultiLabelInformation {
    pub fn new(bit_sets: HashMap<NodeLabel, BitSet>, node_count: usize) -> Self {
        Self {
            bit_sets: Arc::new(bit_sets),
            node_count,
        }
    }

    pub fn empty(node_count: usize) -> Self {
        Self::new(HashMap::new(), node_count)
    }
}

impl LabelInformation for MultiLabelInformation {
    fn is_empty(&self) -> bool {
        self.bit_sets.values().all(|bits| bits.is_empty())
    }

    fn available_node_labels(&self) -> HashSet<NodeLabel> {
        self.bit_sets.keys().cloned().collect()
    }

    fn node_count_for_label(&self, label: &NodeLabel) -> usize {
        if label.is_all_nodes() {
            self.node_count
        } else {
            self.bit_sets
                .get(label)
                .map(|bits| bits.cardinality())
                .unwrap_or(0)
        }
    }

    fn has_label(&self, node_id: MappedNodeId, label: &NodeLabel) -> bool {
        if label.is_all_nodes() {
            return true;
        }
        self.bit_sets
            .get(label)
            .map(|bits| bits.get(node_id as usize))
            .unwrap_or(false)
    }

    fn union_bit_set(&self, labels: &HashSet<NodeLabel>, node_count: usize) -> BitSet {
        let mut union = BitSet::new(node_count);
        if labels.iter().any(|l| l.is_all_nodes()) {
            union.set_range(0, node_count);
            return union;
        }
        for label in labels {
            if let Some(bits) = self.bit_sets.get(label) {
                union.union_with(bits);
            }
        }
        union
    }

    fn filter(&self, labels: &HashSet<NodeLabel>) -> Box<dyn LabelInformation> {
        let kept: HashMap<NodeLabel, BitSet> = self
            .bit_sets
            .iter()
            .filter(|(label, _)| labels.contains(*label))
            .map(|(label, bits)| (label.clone(), bits.clone()))
            .collect();
        Box::new(MultiLabelInformation::new(kept, self.node_count))
    }

    fn node_iterator(
        &self,
        labels: &HashSet<NodeLabel>,
        node_count: usize,
    ) -> Box<dyn Iterator<Item = MappedNodeId>> {
        Box::new(
            self.union_bit_set(labels, node_count)
                .into_iter()
                .map(|id| id as MappedNodeId),
        )
    }

    fn validate_node_labels(&self, labels: &HashSet<NodeLabel>) -> LoadingResult<()> {
        let missing: Vec<&NodeLabel> = labels
            .iter()
            .filter(|l| !l.is_all_nodes() && !self.bit_sets.contains_key(*l))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(unknown_labels_error(missing, self.available_node_labels()))
        }
    }
}

enum BuilderState {
    Empty,
    Single {
        label: NodeLabel,
        bits: Arc<HugeAtomicBitSet>,
    },
    Multi {
        bit_sets: HashMap<NodeLabel, Arc<HugeAtomicBitSet>>,
    },
}

/// Concurrent accumulator for label membership.
///
/// Starts in single-label mode on the first insert; the first insert of a
/// second label upgrades to multi-label mode. Writers share the builder by
/// reference.
pub struct LabelInformationBuilder {
    state: RwLock<BuilderState>,
    capacity: usize,
}

impl LabelInformationBuilder {
    /// A builder that decides its strategy from the labels it sees.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: RwLock::new(BuilderState::Empty),
            capacity,
        }
    }

    /// A builder committed to a single label up front.
    pub fn single(label: NodeLabel, capacity: usize) -> Self {
        Self {
            state: RwLock::new(BuilderState::Single {
                label,
                bits: Arc::new(HugeAtomicBitSet::new(capacity)),
            }),
            capacity,
        }
    }

    /// Records that the node at `import_id` carries `label`.
    ///
    /// The universal label is implicit and ignored here.
    pub fn add(&self, label: &NodeLabel, import_id: usize) {
        if label.is_all_nodes() {
            return;
        }

        // Fast path: the bitset already exists.
        {
            let state = self.state.read();
            match &*state {
                BuilderState::Single { label: own, bits } if own == label => {
                    bits.set(import_id);
                    return;
                }
                BuilderState::Multi { bit_sets } => {
                    if let Some(bits) = bit_sets.get(label) {
                        bits.set(import_id);
                        return;
                    }
                }
                _ => {}
            }
        }

        let mut state = self.state.write();
        match &mut *state {
            BuilderState::Empty => {
                let bits = Arc::new(HugeAtomicBitSet::new(self.capacity));
                bits.set(import_id);
                *state = BuilderState::Single {
                    label: label.clone(),
                    bits,
                };
            }
            BuilderState::Single { label: own, bits } if own == label => {
                bits.set(import_id);
            }
            BuilderState::Single { .. } => {
                // Heterogeneous insert: upgrade to multi-label mode.
                let previous = std::mem::replace(&mut *state, BuilderState::Empty);
                let (old_label, old_bits) = match previous {
                    BuilderState::Single { label, bits } => (label, bits),
                    _ => unreachable!(),
                };
                log::debug!(
                    "upgrading label storage to multi-label mode on first insert of '{}'",
                    label
                );
                let mut bit_sets = HashMap::new();
                bit_sets.insert(old_label, old_bits);
                let bits = Arc::new(HugeAtomicBitSet::new(self.capacity));
                bits.set(import_id);
                bit_sets.insert(label.clone(), bits);
                *state = BuilderState::Multi { bit_sets };
            }
            BuilderState::Multi { bit_sets } => {
                bit_sets
                    .entry(label.clone())
                    .or_insert_with(|| Arc::new(HugeAtomicBitSet::new(self.capacity)))
                    .set(import_id);
            }
        }
    }

    /// Freezes the accumulated membership, pushing every import-time id
    /// through `remap` into the final internal id domain.
    ///
    /// All writers must have been joined before this is called.
    pub fn build<F>(self, node_count: usize, remap: F) -> Box<dyn LabelInformation>
    where
        F: Fn(usize) -> usize,
    {
        match self.state.into_inner() {
            BuilderState::Empty => Box::new(MultiLabelInformation::empty(node_count)),
            BuilderState::Single { label, bits } => Box::new(SingleLabelInformation::new(
                label,
                bits.to_bit_set(node_count, remap),
                node_count,
            )),
            BuilderState::Multi { bit_sets } => {
                let frozen = bit_sets
                    .into_iter()
                    .map(|(label, bits)| (label, bits.to_bit_set(node_count, &remap)))
                    .collect();
                Box::new(MultiLabelInformation::new(frozen, node_count))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str) -> NodeLabel {
        NodeLabel::of(name)
    }

    fn labels(names: &[&str]) -> HashSet<NodeLabel> {
        names.iter().map(|n| NodeLabel::of(*n)).collect()
    }

    #[test]
    fn test_single_label_mode() {
        let builder = LabelInformationBuilder::new(10);
        for id in [0usize, 2, 4] {
            builder.add(&label("A"), id);
        }
        let info = builder.build(10, |id| id);
        assert_eq!(info.node_count_for_label(&label("A")), 3);
        assert_eq!(info.node_count_for_label(&label("B")), 0);
        assert!(info.has_label(2, &label("A")));
        assert!(!info.has_label(1, &label("A")));
    }

    #[test]
    fn test_upgrade_to_multi() {
        let builder = LabelInformationBuilder::new(10);
        builder.add(&label("A"), 0);
        builder.add(&label("B"), 1);
        builder.add(&label("A"), 2);
        let info = builder.build(10, |id| id);
        assert_eq!(info.available_node_labels(), labels(&["A", "B"]));
        assert_eq!(info.node_count_for_label(&label("A")), 2);
        assert_eq!(info.node_count_for_label(&label("B")), 1);
    }

    #[test]
    fn test_all_nodes_label() {
        let builder = LabelInformationBuilder::new(5);
        builder.add(&label("A"), 0);
        let info = builder.build(5, |id| id);
        assert!(info.has_label(3, &NodeLabel::all_nodes()));
        assert_eq!(info.node_count_for_label(&NodeLabel::all_nodes()), 5);
    }

    #[test]
    fn test_union_bit_set() {
        let builder = LabelInformationBuilder::new(10);
        for id in [0usize, 2, 4] {
            builder.add(&label("A"), id);
        }
        for id in [4usize, 5] {
            builder.add(&label("B"), id);
        }
        let info = builder.build(10, |id| id);

        let union = info.union_bit_set(&labels(&["A", "B"]), 10);
        assert_eq!(union.iter().collect::<Vec<_>>(), vec![0, 2, 4, 5]);

        let single = info.union_bit_set(&labels(&["B"]), 10);
        assert_eq!(single.cardinality(), info.node_count_for_label(&label("B")));
    }

    #[test]
    fn test_node_iterator_ascending() {
        let builder = LabelInformationBuilder::new(100);
        for id in [90usize, 5, 40] {
            builder.add(&label("A"), id);
        }
        let info = builder.build(100, |id| id);
        let ids: Vec<_> = info.node_iterator(&labels(&["A"]), 100).collect();
        assert_eq!(ids, vec![5, 40, 90]);
    }

    #[test]
    fn test_filter() {
        let builder = LabelInformationBuilder::new(10);
        builder.add(&label("A"), 0);
        builder.add(&label("B"), 1);
        let info = builder.build(10, |id| id);

        let filtered = info.filter(&labels(&["A"]));
        assert_eq!(filtered.available_node_labels(), labels(&["A"]));
        assert_eq!(filtered.node_count_for_label(&label("B")), 0);
    }

    #[test]
    fn test_validate_unknown_label() {
        let builder = LabelInformationBuilder::new(10);
        builder.add(&label("A"), 0);
        let info = builder.build(10, |id| id);

        assert!(info.validate_node_labels(&labels(&["A"])).is_ok());
        let err = info.validate_node_labels(&labels(&["A", "X"])).unwrap_err();
        match err {
            LoadingError::UnknownLabels { missing, available } => {
                assert_eq!(missing, vec!["X".to_string()]);
                assert_eq!(available, vec!["A".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_remap_on_build() {
        let builder = LabelInformationBuilder::new(10);
        builder.add(&label("A"), 3);
        // Import id 3 ends up as internal id 7.
        let info = builder.build(10, |id| if id == 3 { 7 } else { id });
        assert!(info.has_label(7, &label("A")));
        assert!(!info.has_label(3, &label("A")));
    }

    #[test]
    fn test_empty_builder() {
        let builder = LabelInformationBuilder::new(10);
        let info = builder.build(10, |id| id);
        assert!(info.is_empty());
        assert!(info.available_node_labels().is_empty());
    }

    #[test]
    fn test_single_committed_builder() {
        let builder = LabelInformationBuilder::single(label("Only"), 4);
        builder.add(&label("Only"), 1);
        let info = builder.build(4, |id| id);
        assert_eq!(info.node_count_for_label(&label("Only")), 1);
    }
}
