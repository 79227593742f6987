//! HugeAtomicBitSet - thread-safe atomic bitset for concurrent load
//!
//! Label membership is recorded through this type while builder threads are
//! ingesting nodes. Set operations are CAS loops over 64-bit words, so
//! multiple writers to the same label are safe. On finalize the accumulated
//! bits are remapped into a frozen [`BitSet`] sized to the final node count.

use crate::collections::bit_set::BitSet;
use crate::collections::HugeAtomicLongArray;

const NUM_BITS: usize = 64;

/// Thread-safe atomic bitset with paged backing storage.
///
/// All operations are lock-free; writers share the set by reference.
pub struct HugeAtomicBitSet {
    bits: HugeAtomicLongArray,
    num_bits: usize,
}

impl HugeAtomicBitSet {
    /// Estimated memory usage in bytes for a set of `size` bits.
    pub fn memory_estimation(size: usize) -> usize {
        crate::mem::Estimate::size_of_long_array(crate::mem::BitUtil::ceil_div(size, NUM_BITS))
    }

    /// Creates a new atomic bitset with all bits unset.
    pub fn new(size: usize) -> Self {
        Self {
            bits: HugeAtomicLongArray::new(crate::mem::BitUtil::ceil_div(size, NUM_BITS)),
            num_bits: size,
        }
    }

    /// Returns the state of the bit at `index`.
    ///
    /// Safe to call while other threads modify the set.
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.num_bits, "index {} out of bounds", index);
        let word = self.bits.get(index / NUM_BITS);
        (word >> (index % NUM_BITS)) & 1 == 1
    }

    /// Atomically sets the bit at `index`.
    pub fn set(&self, index: usize) {
        debug_assert!(index < self.num_bits, "index {} out of bounds", index);
        let word_index = index / NUM_BITS;
        let bitmask = 1i64 << (index % NUM_BITS);

        let mut old_word = self.bits.get(word_index);
        loop {
            let new_word = old_word | bitmask;
            if new_word == old_word {
                return;
            }
            let witnessed = self.bits.compare_and_exchange(word_index, old_word, new_word);
            if witnessed == old_word {
                return;
            }
            old_word = witnessed;
        }
    }

    /// Atomically sets the bit at `index` and returns its previous state.
    pub fn get_and_set(&self, index: usize) -> bool {
        debug_assert!(index < self.num_bits, "index {} out of bounds", index);
        let word_index = index / NUM_BITS;
        let bitmask = 1i64 << (index % NUM_BITS);

        let mut old_word = self.bits.get(word_index);
        loop {
            if old_word & bitmask != 0 {
                return true;
            }
            let witnessed =
                self.bits.compare_and_exchange(word_index, old_word, old_word | bitmask);
            if witnessed == old_word {
                return false;
            }
            old_word = witnessed;
        }
    }

    /// Number of set bits.
    ///
    /// Only exact once concurrent writers have been joined.
    pub fn cardinality(&self) -> usize {
        let word_count = self.bits.size();
        let mut total = 0usize;
        for word_index in 0..word_count {
            total += self.bits.get(word_index).count_ones() as usize;
        }
        total
    }

    /// Number of bits this set can hold.
    pub fn size(&self) -> usize {
        self.num_bits
    }

    /// Converts the accumulated bits into a frozen [`BitSet`] of capacity
    /// `node_count`, passing every set bit through `remap` first.
    ///
    /// Import-time ids and final internal ids may differ; `remap` bridges the
    /// two domains. Must be called after all writers have been joined.
    pub fn to_bit_set<F>(&self, node_count: usize, remap: F) -> BitSet
    where
        F: Fn(usize) -> usize,
    {
        let mut frozen = BitSet::new(node_count);
        let word_count = self.bits.size();
        for word_index in 0..word_count {
            let mut word = self.bits.get(word_index) as u64;
            while word != 0 {
                let bit = word.trailing_zeros() as usize;
                frozen.set(remap(word_index * NUM_BITS + bit));
                word &= word - 1;
            }
        }
        frozen
    }
}
