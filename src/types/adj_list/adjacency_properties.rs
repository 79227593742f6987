//! Uncompressed property columns parallel to the adjacency lists.
//!
//! One instance holds one property's values for every edge, laid out in the
//! same per-source, per-ordinal order as the targets. Values are raw 64-bit
//! words; the schema's value type decides how they are read.

use crate::collections::HugeLongArray;
use crate::types::id_map::MappedNodeId;

/// log2 of the value page size.
const PAGE_SHIFT: u32 = 15;
/// Values per page (32 K entries, 256 KiB).
const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
const PAGE_MASK: u64 = (PAGE_SIZE - 1) as u64;

static EMPTY_VALUES: [i64; 0] = [];

/// Read-only storage for one relationship property column.
pub struct AdjacencyProperties {
    pages: Vec<Box<[i64]>>,
    offsets: HugeLongArray,
    degrees: HugeLongArray,
}

impl AdjacencyProperties {
    /// Number of stored values for `source` (its degree).
    pub fn degree(&self, source: MappedNodeId) -> usize {
        self.degrees.get(source as usize) as usize
    }

    /// A cursor over `source`'s property values, ordered by edge ordinal.
    pub fn property_cursor(&self, source: MappedNodeId) -> PropertyCursor<'_> {
        let degree = self.degree(source);
        if degree == 0 {
            return PropertyCursor::empty();
        }
        let offset = self.offsets.get(source as usize) as u64;
        let page = (offset >> PAGE_SHIFT) as usize;
        let index = (offset & PAGE_MASK) as usize;
        PropertyCursor::new(&self.pages[page][index..], degree)
    }
}

/// Bump-allocating builder for [`AdjacencyProperties`].
pub struct AdjacencyPropertiesBuilder {
    pages: Vec<Vec<i64>>,
    current_page: usize,
    offsets: HugeLongArray,
    degrees: HugeLongArray,
}

impl AdjacencyPropertiesBuilder {
    pub fn new(node_count: usize) -> Self {
        Self {
            pages: vec![Vec::with_capacity(PAGE_SIZE)],
            current_page: 0,
            offsets: HugeLongArray::new(node_count),
            degrees: HugeLongArray::new(node_count),
        }
    }

    /// Copies one source's column values into the storage.
    pub fn add(&mut self, source: MappedNodeId, values: &[i64]) {
        if values.is_empty() {
            return;
        }

        let (page_index, in_page) = if values.len() > PAGE_SIZE {
            self.pages.push(values.to_vec());
            (self.pages.len() - 1, 0)
        } else {
            if self.pages[self.current_page].len() + values.len() > PAGE_SIZE {
                self.pages.push(Vec::with_capacity(PAGE_SIZE));
                self.current_page = self.pages.len() - 1;
            }
            let page = &mut self.pages[self.current_page];
            let in_page = page.len();
            page.extend_from_slice(values);
            (self.current_page, in_page)
        };

        let offset = ((page_index as u64) << PAGE_SHIFT) | in_page as u64;
        self.offsets.set(source as usize, offset as i64);
        self.degrees.set(source as usize, values.len() as i64);
    }

    pub fn build(self) -> AdjacencyProperties {
        AdjacencyProperties {
            pages: self
                .pages
                .into_iter()
                .map(|page| page.into_boxed_slice())
                .collect(),
            offsets: self.offsets,
            degrees: self.degrees,
        }
    }
}

/// Cursor over one source's property values.
///
/// Position is a plain index into the column. Missing columns are served by
/// the empty cursor, which reports `has_next() == false` from the start.
#[derive(Clone)]
pub struct PropertyCursor<'a> {
    values: &'a [i64],
    index: usize,
    limit: usize,
}

impl<'a> PropertyCursor<'a> {
    /// A cursor over `degree` values at the start of `values`.
    pub fn new(values: &'a [i64], degree: usize) -> Self {
        Self {
            values,
            index: 0,
            limit: degree,
        }
    }

    /// The cursor over nothing.
    pub fn empty() -> Self {
        Self::new(&EMPTY_VALUES, 0)
    }

    /// Repositions the cursor for pooled reuse.
    pub fn init(&mut self, values: &'a [i64], degree: usize) {
        self.values = values;
        self.index = 0;
        self.limit = degree;
    }

    /// Replaces this cursor's state wholesale with another cursor's.
    pub fn copy_from(&mut self, other: &PropertyCursor<'a>) {
        self.clone_from(other);
    }

    /// True while values remain.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.index < self.limit
    }

    /// The next raw 64-bit value.
    ///
    /// Calling this after `has_next()` returned false is undefined
    /// behavior; debug builds assert.
    #[inline]
    pub fn next_value(&mut self) -> i64 {
        debug_assert!(self.has_next(), "property cursor exhausted");
        let value = self.values[self.index];
        self.index += 1;
        value
    }

    /// The next value reinterpreted as a double.
    #[inline]
    pub fn next_double(&mut self) -> f64 {
        f64::from_bits(self.next_value() as u64)
    }

    /// Releases the cursor's view; it reports exhaustion afterwards.
    pub fn close(&mut self) {
        self.values = &EMPTY_VALUES;
        self.index = 0;
        self.limit = 0;
    }
}
