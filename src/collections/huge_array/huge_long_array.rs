//! HugeLongArray - i64 array supporting billions of elements
//!
//! The workhorse numeric array of the crate: forward id mappings, byte
//! offsets, and degree tables are all stored in it.

use crate::collections::{ArrayUtil, PageUtil};
use rayon::prelude::*;

/// Maximum size for single-page arrays.
const MAX_ARRAY_LENGTH: usize = 1 << 28;

/// A long-indexable i64 array that can contain more than 2 billion elements.
///
/// Small arrays are backed by a single allocation; larger ones by 4 KiB pages.
/// The split is an implementation detail; indexing behaves identically.
///
/// # Characteristics
///
/// - **Fixed size**: cannot grow or shrink after creation
/// - **Dense storage**: every position consumes memory
/// - **Zero default**: unset values read as `0`
/// - **Thread safety**: concurrent reads are safe, writes are not
///
/// # Examples
///
/// ```ignore
/// use graphmem::collections::HugeLongArray;
///
/// let mut originals = HugeLongArray::new(1_000_000);
/// originals.set(0, 42);
/// assert_eq!(originals.get(0), 42);
/// assert_eq!(originals.get(1), 0);
/// ```
pub enum HugeLongArray {
    /// Single-allocation implementation for arrays ≤ MAX_ARRAY_LENGTH
    Single(SingleHugeLongArray),
    /// Multi-page implementation for larger arrays
    Paged(PagedHugeLongArray),
}

impl HugeLongArray {
    /// Creates a new zero-filled array of the given size.
    pub fn new(size: usize) -> Self {
        if size <= MAX_ARRAY_LENGTH {
            Self::Single(SingleHugeLongArray::new(size))
        } else {
            Self::Paged(PagedHugeLongArray::new(size))
        }
    }

    /// Adopts pre-filled pages produced by a concurrent builder.
    ///
    /// All pages except the last must share the same power-of-two length;
    /// `size` is the logical element count.
    pub fn of(pages: Vec<Vec<i64>>, size: usize) -> Self {
        if pages.len() <= 1 && size <= MAX_ARRAY_LENGTH {
            let mut page = pages.into_iter().next().unwrap_or_default();
            page.truncate(size);
            Self::Single(SingleHugeLongArray { data: page })
        } else {
            Self::Paged(PagedHugeLongArray::from_pages(pages, size))
        }
    }

    /// Creates a new array from the provided values.
    pub fn from_vec(values: Vec<i64>) -> Self {
        let size = values.len();
        if size <= MAX_ARRAY_LENGTH {
            Self::Single(SingleHugeLongArray { data: values })
        } else {
            let mut array = Self::new(size);
            for (i, &value) in values.iter().enumerate() {
                array.set(i, value);
            }
            array
        }
    }

    /// Returns the value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    #[inline]
    pub fn get(&self, index: usize) -> i64 {
        match self {
            Self::Single(arr) => arr.get(index),
            Self::Paged(arr) => arr.get(index),
        }
    }

    /// Sets the value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    #[inline]
    pub fn set(&mut self, index: usize, value: i64) {
        match self {
            Self::Single(arr) => arr.set(index, value),
            Self::Paged(arr) => arr.set(index, value),
        }
    }

    /// Sets all elements using the provided generator function.
    pub fn set_all<F>(&mut self, gen: F)
    where
        F: Fn(usize) -> i64,
    {
        match self {
            Self::Single(arr) => arr.set_all(gen),
            Self::Paged(arr) => arr.set_all(gen),
        }
    }

    /// Fills all elements with the specified value.
    pub fn fill(&mut self, value: i64) {
        match self {
            Self::Single(arr) => arr.data.fill(value),
            Self::Paged(arr) => {
                for page in &mut arr.pages {
                    page.fill(value);
                }
            }
        }
    }

    /// Returns the number of elements in the array.
    pub fn size(&self) -> usize {
        match self {
            Self::Single(arr) => arr.data.len(),
            Self::Paged(arr) => arr.size,
        }
    }

    /// Returns the memory used by this array in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            Self::Single(arr) => arr.data.len() * std::mem::size_of::<i64>(),
            Self::Paged(arr) => arr
                .pages
                .iter()
                .map(|p| p.len() * std::mem::size_of::<i64>())
                .sum(),
        }
    }

    /// Largest value in the array, computed page-parallel.
    ///
    /// Returns `None` for an empty array.
    pub fn max(&self) -> Option<i64> {
        match self {
            Self::Single(arr) => arr.data.par_iter().copied().max(),
            Self::Paged(arr) => arr
                .pages
                .par_iter()
                .filter_map(|page| page.iter().copied().max())
                .max(),
        }
    }

    /// Performs binary search for the given value (array must be sorted).
    ///
    /// Returns the index if found, or `-(insertion_point + 1)` if not found.
    pub fn binary_search(&self, search_value: i64) -> isize {
        match self {
            Self::Single(arr) => {
                ArrayUtil::binary_search_index(&arr.data, arr.data.len(), search_value)
            }
            Self::Paged(arr) => arr.binary_search(search_value),
        }
    }

    /// Creates an iterator over all values.
    pub fn iter(&self) -> HugeLongArrayIter<'_> {
        HugeLongArrayIter {
            array: self,
            index: 0,
        }
    }

    /// Converts to a standard Vec.
    pub fn to_vec(&self) -> Vec<i64> {
        self.iter().collect()
    }
}

/// Iterator for HugeLongArray
pub struct HugeLongArrayIter<'a> {
    array: &'a HugeLongArray,
    index: usize,
}

impl<'a> Iterator for HugeLongArrayIter<'a> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.index < self.array.size() {
            let value = self.array.get(self.index);
            self.index += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.size() - self.index;
        (remaining, Some(remaining))
    }
}

/// Single-allocation implementation for arrays ≤ MAX_ARRAY_LENGTH
pub struct SingleHugeLongArray {
    data: Vec<i64>,
}

impl SingleHugeLongArray {
    fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    #[inline]
    fn get(&self, index: usize) -> i64 {
        self.data[index]
    }

    #[inline]
    fn set(&mut self, index: usize, value: i64) {
        self.data[index] = value;
    }

    fn set_all<F>(&mut self, gen: F)
    where
        F: Fn(usize) -> i64,
    {
        for (i, value) in self.data.iter_mut().enumerate() {
            *value = gen(i);
        }
    }
}

/// Multi-page implementation for arrays > MAX_ARRAY_LENGTH
pub struct PagedHugeLongArray {
    pages: Vec<Vec<i64>>,
    size: usize,
    page_shift: u32,
    page_mask: usize,
}

impl PagedHugeLongArray {
    fn new(size: usize) -> Self {
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
            pages.push(vec![0; page_length]);
        }

        Self {
            pages,
            size,
            page_shift,
            page_mask,
        }
    }

    fn from_pages(pages: Vec<Vec<i64>>, size: usize) -> Self {
        let page_size = pages
            .first()
            .map(|p| p.len())
            .filter(|len| *len > 0)
            .unwrap_or_else(|| {
                PageUtil::page_size_for(PageUtil::PAGE_SIZE_4KB, std::mem::size_of::<i64>())
            });
        debug_assert!(crate::mem::BitUtil::is_power_of_two(page_size));
        Self {
            pages,
            size,
            page_shift: page_size.trailing_zeros(),
            page_mask: page_size - 1,
        }
    }

    #[inline]
    fn get(&self, index: usize) -> i64 {
        assert!(index < self.size, "index {} out of bounds", index);
        let page_index = PageUtil::page_index(index, self.page_shift);
        let index_in_page = PageUtil::index_in_page(index, self.page_mask);
        self.pages[page_index][index_in_page]
    }

    #[inline]
    fn set(&mut self, index: usize, value: i64) {
        assert!(index < self.size, "index {} out of bounds", index);
        let page_index = PageUtil::page_index(index, self.page_shift);
        let index_in_page = PageUtil::index_in_page(index, self.page_mask);
        self.pages[page_index][index_in_page] = value;
    }

    fn set_all<F>(&mut self, gen: F)
    where
        F: Fn(usize) -> i64,
    {
        let mut global_index = 0;
        for page in &mut self.pages {
            for value in page.iter_mut() {
                if global_index < self.size {
                    *value = gen(global_index);
                    global_index += 1;
                }
            }
        }
    }

    fn binary_search(&self, search_value: i64) -> isize {
        let mut low = 0isize;
        let mut high = self.size as isize - 1;
        while low <= high {
            let mid = (low + high) >> 1;
            let mid_val = self.get(mid as usize);
            if mid_val < search_value {
                low = mid + 1;
            } else if mid_val > search_value {
                high = mid - 1;
            } else {
                return mid;
            }
        }
        -(low + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let array = HugeLongArray::new(100);
        assert_eq!(array.size(), 100);
        assert_eq!(array.get(0), 0);
    }

    #[test]
    fn test_get_set() {
        let mut array = HugeLongArray::new(10);
        array.set(5, 42);
        assert_eq!(array.get(5), 42);
    }

    #[test]
    fn test_fill() {
        let mut array = HugeLongArray::new(100);
        array.fill(99);
        assert_eq!(array.get(0), 99);
        assert_eq!(array.get(99), 99);
    }

    #[test]
    fn test_set_all() {
        let mut array = HugeLongArray::new(5);
        array.set_all(|i| (i * 2) as i64);
        assert_eq!(array.to_vec(), vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_from_vec() {
        let array = HugeLongArray::from_vec(vec![10, 20, 30]);
        assert_eq!(array.size(), 3);
        assert_eq!(array.get(1), 20);
    }

    #[test]
    fn test_of_pages() {
        let pages = vec![vec![1, 2, 3, 4], vec![5, 6]];
        let array = HugeLongArray::of(pages, 6);
        assert_eq!(array.size(), 6);
        assert_eq!(array.get(0), 1);
        assert_eq!(array.get(3), 4);
        assert_eq!(array.get(4), 5);
        assert_eq!(array.get(5), 6);
    }

    #[test]
    fn test_of_single_truncates() {
        let array = HugeLongArray::of(vec![vec![7, 8, 9, 0]], 3);
        assert_eq!(array.size(), 3);
        assert_eq!(array.to_vec(), vec![7, 8, 9]);
    }

    #[test]
    fn test_max() {
        let array = HugeLongArray::from_vec(vec![3, 99, 7, 42]);
        assert_eq!(array.max(), Some(99));
        assert_eq!(HugeLongArray::new(0).max(), None);
    }

    #[test]
    fn test_binary_search() {
        let array = HugeLongArray::from_vec(vec![1, 3, 5, 7, 9]);
        assert_eq!(array.binary_search(5), 2);
        assert_eq!(array.binary_search(9), 4);
        assert!(array.binary_search(4) < 0);
    }

    #[test]
    fn test_iter_sum() {
        let mut array = HugeLongArray::new(5);
        array.set_all(|i| i as i64);
        let sum: i64 = array.iter().sum();
        assert_eq!(sum, 10);
    }

    #[test]
    fn test_paged_array() {
        let size = MAX_ARRAY_LENGTH + 1000;
        let mut array = HugeLongArray::new(size);

        array.set(0, 100);
        array.set(MAX_ARRAY_LENGTH, 200);
        array.set(size - 1, 300);

        assert_eq!(array.get(0), 100);
        assert_eq!(array.get(MAX_ARRAY_LENGTH), 200);
        assert_eq!(array.get(size - 1), 300);
    }
}
