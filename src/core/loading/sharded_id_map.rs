//! Sharded original→internal id assignment with deduplication.
//!
//! Original ids may arrive absurdly sparse and in arbitrary order from many
//! threads at once. Assignment goes through a hash-sharded map: each shard
//! owns a disjoint slice of the key space and takes its own lock, so
//! contention stays proportional to `1 / shard_count`. Internal ids come
//! from a single shared counter, which keeps them dense across shards.
//!
//! The map lives only for the duration of the build. Reverse lookup after
//! finalize is served by the sparse array built from the forward mapping,
//! not by these shards.

use crate::concurrency::Concurrency;
use crate::mem::BitUtil;
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Multiplicative spread for shard selection; the high bits of the product
/// are well mixed, so they pick the shard.
const SPREAD: i64 = 0x9E37_79B9_7F4A_7C15u64 as i64;

/// Concurrent builder assigning dense internal ids to sparse original ids.
///
/// `add_node` is atomic and encodes whether the original id was first seen
/// in its sign: a non-negative result is a freshly assigned internal id; a
/// negative result `v` means the id existed already at `-v - 1`. Callers use
/// the distinction to decide whether to record the forward mapping without a
/// second lookup.
pub struct ShardedIdMapBuilder {
    shards: Vec<Mutex<HashMap<i64, i64>>>,
    next_id: AtomicI64,
    shard_mask: usize,
}

impl ShardedIdMapBuilder {
    /// Creates a builder with a shard count derived from the concurrency
    /// hint (four shards per thread, rounded up to a power of two).
    pub fn new(concurrency: Concurrency) -> Self {
        let shard_count = BitUtil::next_highest_power_of_two(concurrency.value() * 4);
        let mut shards = Vec::with_capacity(shard_count);
        shards.resize_with(shard_count, || Mutex::new(HashMap::new()));
        Self {
            shards,
            next_id: AtomicI64::new(0),
            shard_mask: shard_count - 1,
        }
    }

    /// Assigns an internal id to `original_id`, or reports the existing one.
    ///
    /// Returns the new internal id (`>= 0`) on first insertion, and
    /// `-(existing) - 1` when the original id was already present.
    pub fn add_node(&self, original_id: i64) -> i64 {
        let mut shard = self.shards[self.shard_index(original_id)].lock();
        match shard.entry(original_id) {
            Entry::Occupied(entry) => -entry.get() - 1,
            Entry::Vacant(entry) => {
                let internal_id = self.next_id.fetch_add(1, Ordering::Relaxed);
                entry.insert(internal_id);
                internal_id
            }
        }
    }

    /// Looks up the internal id of `original_id` without inserting.
    pub fn get(&self, original_id: i64) -> Option<i64> {
        self.shards[self.shard_index(original_id)]
            .lock()
            .get(&original_id)
            .copied()
    }

    /// Number of distinct original ids seen so far.
    pub fn size(&self) -> usize {
        self.next_id.load(Ordering::SeqCst) as usize
    }

    fn shard_index(&self, key: i64) -> usize {
        let spread = (key.wrapping_mul(SPREAD) as u64) >> 32;
        spread as usize & self.shard_mask
    }
}
