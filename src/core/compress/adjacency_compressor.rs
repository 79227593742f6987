//! Per-source accumulation of compressed target lists.
//!
//! One compressor instance serves every source concurrently. Each source
//! owns its buffer state behind a fine-grained lock, so the write contract
//! is per-source exclusivity with uniform throughput; producers that
//! partition sources by hash never contend at all.
//!
//! Targets append through the delta → zigzag → varlong pipeline. Appends
//! may arrive out of ascending order; the buffer tracks that, and drain
//! restores order by decoding, sorting together with the property columns,
//! and re-encoding before the visitor sees the bytes.

use crate::core::compress::paired_sort::sort_targets_with_properties;
use crate::core::compress::vlong::{
    decode_vlong, encode_vlong, encoded_vlong_length, unzigzag, zigzag,
};
use crate::core::compress::IGNORE_VALUE;
use crate::core::loading::{LoadingError, LoadingResult};
use crate::mem::MemoryRange;
use crate::types::id_map::MappedNodeId;
use parking_lot::Mutex;

/// Hard cap on a single source's byte buffer.
const MAX_BUFFER_SIZE: usize = crate::core::loading::MAX_PAGE_SIZE;

/// Initial buffer capacity on first append.
const MIN_BUFFER_SIZE: usize = 64;

/// Growable compressed state of one source.
struct CompressedTargets {
    bytes: Box<[u8]>,
    /// Write offset into `bytes`; not the neighbor count.
    position: usize,
    last_value: i64,
    /// Neighbor count.
    length: usize,
    sorted: bool,
    properties: Vec<Vec<i64>>,
}

impl CompressedTargets {
    fn new(property_count: usize) -> Self {
        Self {
            bytes: Box::new([]),
            position: 0,
            last_value: 0,
            length: 0,
            sorted: true,
            properties: vec![Vec::new(); property_count],
        }
    }

    /// Power-of-two growth, bounded by [`MAX_BUFFER_SIZE`].
    fn ensure_capacity(&mut self, required: usize) -> LoadingResult<()> {
        if required <= self.bytes.len() {
            return Ok(());
        }
        if required > MAX_BUFFER_SIZE {
            return Err(LoadingError::BufferOverflow {
                position: self.position,
                required,
            });
        }
        let mut new_capacity = self.bytes.len().max(MIN_BUFFER_SIZE);
        while new_capacity < required {
            new_capacity <<= 1;
        }
        let mut grown = vec![0u8; new_capacity].into_boxed_slice();
        grown[..self.position].copy_from_slice(&self.bytes[..self.position]);
        self.bytes = grown;
        Ok(())
    }

    fn append(&mut self, target: i64) -> LoadingResult<()> {
        let delta = target - self.last_value;
        if delta < 0 {
            self.sorted = false;
        }
        let encoded = zigzag(delta);
        self.ensure_capacity(self.position + encoded_vlong_length(encoded))?;
        self.position = encode_vlong(encoded, &mut self.bytes, self.position);
        self.last_value = target;
        self.length += 1;
        Ok(())
    }

    /// Decodes the accumulated deltas back into absolute target ids.
    fn decode_targets(&self) -> Vec<i64> {
        let mut targets = Vec::with_capacity(self.length);
        let mut value = 0i64;
        let mut pos = 0;
        for _ in 0..self.length {
            let (encoded, next) = decode_vlong(&self.bytes, pos);
            value += unzigzag(encoded);
            targets.push(value);
            pos = next;
        }
        debug_assert_eq!(pos, self.position);
        targets
    }
}

/// One drained source, handed to the [`AdjacencyCompressor::drain`] visitor.
///
/// The slices alias the compressor's internal buffers and are released for
/// reuse as soon as the visitor returns; visitors must copy what they keep.
pub struct DrainedSource<'a> {
    pub source: MappedNodeId,
    pub bytes: &'a [u8],
    pub byte_length: usize,
    pub properties: &'a [Vec<i64>],
    pub degree: usize,
}

/// Concurrent per-source adjacency compressor.
pub struct AdjacencyCompressor {
    states: Vec<Mutex<CompressedTargets>>,
    property_count: usize,
}

impl AdjacencyCompressor {
    /// Creates a compressor for sources in `[0, node_count)` with
    /// `property_count` parallel property columns per source.
    pub fn new(node_count: usize, property_count: usize) -> Self {
        let mut states = Vec::with_capacity(node_count);
        states.resize_with(node_count, || Mutex::new(CompressedTargets::new(property_count)));
        Self {
            states,
            property_count,
        }
    }

    /// Number of parallel property columns per source.
    pub fn property_count(&self) -> usize {
        self.property_count
    }

    /// Appends a batch of targets for one source.
    ///
    /// Targets equal to [`IGNORE_VALUE`] are skipped; `valid_count` is the
    /// count excluding them. Returns the source's degree after the append.
    pub fn add(
        &self,
        source: MappedNodeId,
        targets: &[i64],
        valid_count: usize,
    ) -> LoadingResult<usize> {
        let mut state = self.states[source as usize].lock();
        let mut appended = 0;
        for &target in targets {
            if target == IGNORE_VALUE {
                continue;
            }
            state.append(target)?;
            appended += 1;
        }
        debug_assert_eq!(appended, valid_count, "valid_count does not match batch");
        Ok(state.length)
    }

    /// Appends a batch of targets with one value per property column.
    ///
    /// `properties[k][i]` belongs to `targets[i]`; entries for skipped
    /// targets are skipped in every column as well.
    pub fn add_with_properties(
        &self,
        source: MappedNodeId,
        targets: &[i64],
        properties: &[&[i64]],
        valid_count: usize,
    ) -> LoadingResult<usize> {
        debug_assert_eq!(
            properties.len(),
            self.property_count,
            "property column count mismatch"
        );
        let mut state = self.states[source as usize].lock();
        let mut appended = 0;
        for (index, &target) in targets.iter().enumerate() {
            if target == IGNORE_VALUE {
                continue;
            }
            state.append(target)?;
            for (column, values) in properties.iter().enumerate() {
                state.properties[column].push(values[index]);
            }
            appended += 1;
        }
        debug_assert_eq!(appended, valid_count, "valid_count does not match batch");
        Ok(state.length)
    }

    /// Current degree of a source.
    pub fn degree(&self, source: MappedNodeId) -> usize {
        self.states[source as usize].lock().length
    }

    /// Visits every non-empty source in ascending order, handing over its
    /// packed bytes and property columns, then releases the source's
    /// buffers. Each source is visited at most once across all drains.
    ///
    /// Sources whose appends arrived out of order are re-encoded in
    /// ascending target order first; property columns are permuted along.
    /// The visitor must not call back into the compressor.
    pub fn drain<F>(&self, mut visitor: F) -> LoadingResult<()>
    where
        F: FnMut(DrainedSource<'_>),
    {
        let mut drained = 0usize;
        for (source, slot) in self.states.iter().enumerate() {
            let mut state = slot.lock();
            if state.length == 0 {
                continue;
            }

            if !state.sorted {
                let mut targets = state.decode_targets();
                let mut properties = std::mem::take(&mut state.properties);
                sort_targets_with_properties(&mut targets, &mut properties);

                let mut reencoded = CompressedTargets::new(0);
                for &target in &targets {
                    reencoded.append(target)?;
                }
                debug_assert!(reencoded.sorted);
                reencoded.properties = properties;
                *state = reencoded;
            }

            visitor(DrainedSource {
                source: source as MappedNodeId,
                bytes: &state.bytes[..state.position],
                byte_length: state.position,
                properties: &state.properties,
                degree: state.length,
            });

            *state = CompressedTargets::new(self.property_count);
            drained += 1;
        }
        log::debug!("drained {} adjacency lists", drained);
        Ok(())
    }

    /// Best/worst-case size projection for capacity planning.
    ///
    /// Best case assumes consecutive targets (delta 1, one byte per edge);
    /// worst case assumes deltas around `node_count / avg_degree`. Property
    /// columns are 8 bytes per edge per column in either case.
    pub fn estimate_memory(
        node_count: usize,
        avg_degree: usize,
        property_count: usize,
    ) -> MemoryRange {
        let edge_count = node_count * avg_degree;
        let per_source_overhead =
            std::mem::size_of::<Mutex<CompressedTargets>>() * node_count;
        let property_bytes = edge_count * std::mem::size_of::<i64>() * property_count;

        let best = edge_count + per_source_overhead + property_bytes;
        let worst_delta = zigzag((node_count / avg_degree.max(1)) as i64);
        let worst =
            edge_count * encoded_vlong_length(worst_delta) + per_source_overhead + property_bytes;
        MemoryRange::of_range(best, worst.max(best))
    }
}
