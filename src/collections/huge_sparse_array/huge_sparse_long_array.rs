//! HugeSparseLongArray - sparse i64 array over a huge, mostly-empty domain
//!
//! Backs the original→internal reverse mapping, whose key domain is
//! `[0, highest_original_id]` but whose populated entries may cluster in a
//! few hot ranges. The layout is pages-of-pages: a dense top-level vector of
//! page slots, each value page allocated only when a key in its range is
//! first written. Untouched ranges cost one empty slot, not a page.
//!
//! The builder side is thread-safe: page allocation goes through a
//! `OnceCell` per slot, and writes within a page are atomic stores. Distinct
//! keys never race by construction (each original id is written by exactly
//! one internal id's partition), so `Relaxed` ordering suffices.

use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicI64, Ordering};

/// log2 of the value page size.
pub const PAGE_SHIFT: u32 = 12;
/// Number of entries per value page.
pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
const PAGE_MASK: usize = PAGE_SIZE - 1;

/// Read-only sparse i64 array. Unset entries read as the default value.
pub struct HugeSparseLongArray {
    pages: Vec<Option<Box<[i64]>>>,
    default_value: i64,
    capacity: usize,
}

impl HugeSparseLongArray {
    /// Number of top-level page slots needed to cover `capacity` entries.
    pub fn page_count_for(capacity: usize) -> usize {
        crate::mem::BitUtil::ceil_div(capacity, PAGE_SIZE)
    }

    /// Creates a thread-safe builder covering `[0, capacity)` entries.
    pub fn builder(capacity: usize, default_value: i64) -> HugeSparseLongArrayBuilder {
        let mut pages = Vec::new();
        pages.resize_with(Self::page_count_for(capacity), OnceCell::new);
        HugeSparseLongArrayBuilder {
            pages,
            default_value,
            capacity,
        }
    }

    /// Returns the value at `index`, or the default value if unset or out of
    /// range.
    #[inline]
    pub fn get(&self, index: usize) -> i64 {
        if index >= self.capacity {
            return self.default_value;
        }
        match &self.pages[index >> PAGE_SHIFT] {
            Some(page) => page[index & PAGE_MASK],
            None => self.default_value,
        }
    }

    /// True if the entry at `index` holds a non-default value.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.get(index) != self.default_value
    }

    /// The exclusive upper bound of the key domain.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of value pages actually allocated.
    pub fn allocated_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }
}

/// Concurrent builder for [`HugeSparseLongArray`].
///
/// Shared between builder threads by reference; `set` never blocks except on
/// first touch of a page.
pub struct HugeSparseLongArrayBuilder {
    pages: Vec<OnceCell<Box<[AtomicI64]>>>,
    default_value: i64,
    capacity: usize,
}

impl HugeSparseLongArrayBuilder {
    /// Writes `value` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    pub fn set(&self, index: usize, value: i64) {
        assert!(index < self.capacity, "index {} out of bounds", index);
        let page = self.pages[index >> PAGE_SHIFT].get_or_init(|| {
            let mut page = Vec::with_capacity(PAGE_SIZE);
            page.resize_with(PAGE_SIZE, || AtomicI64::new(self.default_value));
            page.into_boxed_slice()
        });
        page[index & PAGE_MASK].store(value, Ordering::Relaxed);
    }

    /// Freezes the builder into a read-only array.
    pub fn build(self) -> HugeSparseLongArray {
        let pages = self
            .pages
            .into_iter()
            .map(|cell| {
                cell.into_inner().map(|page| {
                    page.into_vec()
                        .into_iter()
                        .map(AtomicI64::into_inner)
                        .collect::<Vec<_>>()
                        .into_boxed_slice()
                })
            })
            .collect();
        HugeSparseLongArray {
            pages,
            default_value: self.default_value,
            capacity: self.capacity,
        }
    }
}
