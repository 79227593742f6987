//! HugeDoubleArray - f64 array supporting billions of elements
//!
//! Backs floating-point node property columns. Same paged layout as
//! [`HugeLongArray`](crate::collections::HugeLongArray), without the search
//! helpers that only make sense for sorted id arrays.

use crate::collections::PageUtil;

const MAX_ARRAY_LENGTH: usize = 1 << 28;

/// A long-indexable f64 array that can contain more than 2 billion elements.
///
/// Unset values read as `0.0`. Concurrent reads are safe, writes are not.
pub enum HugeDoubleArray {
    Single(SingleHugeDoubleArray),
    Paged(PagedHugeDoubleArray),
}

impl HugeDoubleArray {
    /// Creates a new zero-filled array of the given size.
    pub fn new(size: usize) -> Self {
        if size <= MAX_ARRAY_LENGTH {
            Self::Single(SingleHugeDoubleArray {
                data: vec![0.0; size],
            })
        } else {
            Self::Paged(PagedHugeDoubleArray::new(size))
        }
    }

    /// Creates a new array from the provided values.
    pub fn from_vec(values: Vec<f64>) -> Self {
        let size = values.len();
        if size <= MAX_ARRAY_LENGTH {
            Self::Single(SingleHugeDoubleArray { data: values })
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
    pub fn get(&self, index: usize) -> f64 {
        match self {
            Self::Single(arr) => arr.data[index],
            Self::Paged(arr) => arr.get(index),
        }
    }

    /// Sets the value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    #[inline]
    pub fn set(&mut self, index: usize, value: f64) {
        match self {
            Self::Single(arr) => arr.data[index] = value,
            Self::Paged(arr) => arr.set(index, value),
        }
    }

    /// Fills all elements with the specified value.
    pub fn fill(&mut self, value: f64) {
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
            Self::Single(arr) => arr.data.len() * std::mem::size_of::<f64>(),
            Self::Paged(arr) => arr
                .pages
                .iter()
                .map(|p| p.len() * std::mem::size_of::<f64>())
                .sum(),
        }
    }

    /// Converts to a standard Vec.
    pub fn to_vec(&self) -> Vec<f64> {
        (0..self.size()).map(|i| self.get(i)).collect()
    }
}

pub struct SingleHugeDoubleArray {
    data: Vec<f64>,
}

pub struct PagedHugeDoubleArray {
    pages: Vec<Vec<f64>>,
    size: usize,
    page_shift: u32,
    page_mask: usize,
}

impl PagedHugeDoubleArray {
    fn new(size: usize) -> Self {
        let page_size =
            PageUtil::page_size_for(PageUtil::PAGE_SIZE_4KB, std::mem::size_of::<f64>());
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
            pages.push(vec![0.0; page_length]);
        }

        Self {
            pages,
            size,
            page_shift,
            page_mask,
        }
    }

    #[inline]
    fn get(&self, index: usize) -> f64 {
        assert!(index < self.size, "index {} out of bounds", index);
        let page_index = PageUtil::page_index(index, self.page_shift);
        let index_in_page = PageUtil::index_in_page(index, self.page_mask);
        self.pages[page_index][index_in_page]
    }

    #[inline]
    fn set(&mut self, index: usize, value: f64) {
        assert!(index < self.size, "index {} out of bounds", index);
        let page_index = PageUtil::page_index(index, self.page_shift);
        let index_in_page = PageUtil::index_in_page(index, self.page_mask);
        self.pages[page_index][index_in_page] = value;
    }
}
