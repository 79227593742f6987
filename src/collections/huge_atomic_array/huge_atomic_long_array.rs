//! HugeAtomicLongArray - thread-safe i64 array for concurrent building
//!
//! Builder threads write internal→original mappings and bitset words through
//! this array while load is in flight. Once building finishes, the array is
//! frozen into a plain [`HugeLongArray`] for lock-free reads.
//!
//! All operations use explicit atomic orderings: plain reads and writes are
//! `Relaxed` (builder threads write disjoint ranges and synchronize through
//! the surrounding join), CAS loops use `AcqRel` on success.

use crate::collections::huge_array::HugeLongArray;
use crate::collections::PageUtil;
use std::sync::atomic::{AtomicI64, Ordering};

/// A fixed-size array of atomic i64 values with paged backing storage.
///
/// Shared between threads by reference; all methods take `&self`.
pub struct HugeAtomicLongArray {
    pages: Vec<Vec<AtomicI64>>,
    size: usize,
    page_shift: u32,
    page_mask: usize,
}

impl HugeAtomicLongArray {
    /// Creates a new zero-initialized array of the given size.
    pub fn new(size: usize) -> Self {
        let page_size =
            PageUtil::page_size_for(PageUtil::PAGE_SIZE_4KB, std::mem::size_of::<i64>());
        let page_shift = page_size.trailing_zeros();
        let page_mask = page_size - 1;
        let num_pages = PageUtil::num_pages_for(size, page_size);

        let mut pages = Vec::with_capacity(num_pages);
        for page_index in 0..num_pages {
            let page_length = if page_index == num_pages - 1 {
                PageUtil::exclusive_index_of_page(size, page_mask)
            } else {
                page_size
            };
            let mut page = Vec::with_capacity(page_length);
            page.resize_with(page_length, || AtomicI64::new(0));
            pages.push(page);
        }

        Self {
            pages,
            size,
            page_shift,
            page_mask,
        }
    }

    #[inline]
    fn slot(&self, index: usize) -> &AtomicI64 {
        debug_assert!(index < self.size, "index {} out of bounds", index);
        let page_index = PageUtil::page_index(index, self.page_shift);
        let index_in_page = PageUtil::index_in_page(index, self.page_mask);
        &self.pages[page_index][index_in_page]
    }

    /// Atomically reads the value at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> i64 {
        self.slot(index).load(Ordering::Relaxed)
    }

    /// Atomically writes `value` at `index`.
    #[inline]
    pub fn set(&self, index: usize, value: i64) {
        self.slot(index).store(value, Ordering::Relaxed)
    }

    /// Atomically adds `delta` and returns the previous value.
    #[inline]
    pub fn get_and_add(&self, index: usize, delta: i64) -> i64 {
        self.slot(index).fetch_add(delta, Ordering::AcqRel)
    }

    /// Compare-and-exchange: if the slot holds `expected`, replaces it with
    /// `update`. Returns the witnessed value, which equals `expected` exactly
    /// when the exchange happened.
    #[inline]
    pub fn compare_and_exchange(&self, index: usize, expected: i64, update: i64) -> i64 {
        match self.slot(index).compare_exchange(
            expected,
            update,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(previous) => previous,
            Err(witnessed) => witnessed,
        }
    }

    /// Returns the number of elements in the array.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Freezes the array into a read-only [`HugeLongArray`] of logical length
    /// `length`, consuming the atomic storage without copying pages.
    ///
    /// # Panics
    ///
    /// Panics if `length > size`.
    pub fn into_huge_long_array(self, length: usize) -> HugeLongArray {
        assert!(length <= self.size, "length {} exceeds size", length);
        let mut pages: Vec<Vec<i64>> = self
            .pages
            .into_iter()
            .map(|page| page.into_iter().map(AtomicI64::into_inner).collect())
            .collect();

        // Drop pages that lie entirely beyond the logical length.
        if !pages.is_empty() {
            let page_size = pages[0].len().max(1);
            let needed = PageUtil::num_pages_for(length, page_size).max(1);
            pages.truncate(needed);
        }
        HugeLongArray::of(pages, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_get_set() {
        let array = HugeAtomicLongArray::new(16);
        array.set(7, 99);
        assert_eq!(array.get(7), 99);
        assert_eq!(array.get(8), 0);
    }

    #[test]
    fn test_get_and_add() {
        let array = HugeAtomicLongArray::new(4);
        assert_eq!(array.get_and_add(0, 5), 0);
        assert_eq!(array.get_and_add(0, 5), 5);
        assert_eq!(array.get(0), 10);
    }

    #[test]
    fn test_compare_and_exchange() {
        let array = HugeAtomicLongArray::new(2);
        assert_eq!(array.compare_and_exchange(0, 0, 42), 0);
        assert_eq!(array.get(0), 42);
        // Mismatched expectation leaves the slot untouched.
        assert_eq!(array.compare_and_exchange(0, 0, 7), 42);
        assert_eq!(array.get(0), 42);
    }

    #[test]
    fn test_concurrent_adds() {
        let array = Arc::new(HugeAtomicLongArray::new(1));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let array = Arc::clone(&array);
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    array.get_and_add(0, 1);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(array.get(0), 8000);
    }

    #[test]
    fn test_into_huge_long_array() {
        let array = HugeAtomicLongArray::new(1000);
        for i in 0..700 {
            array.set(i, i as i64 * 3);
        }
        let frozen = array.into_huge_long_array(700);
        assert_eq!(frozen.size(), 700);
        assert_eq!(frozen.get(0), 0);
        assert_eq!(frozen.get(699), 699 * 3);
    }

    #[test]
    fn test_paged_layout() {
        // Larger than one 4 KiB page of i64s (512 elements).
        let array = HugeAtomicLongArray::new(2000);
        array.set(511, 1);
        array.set(512, 2);
        array.set(1999, 3);
        assert_eq!(array.get(511), 1);
        assert_eq!(array.get(512), 2);
        assert_eq!(array.get(1999), 3);
    }
}
