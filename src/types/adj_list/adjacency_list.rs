//! Frozen storage for compressed adjacency lists.
//!
//! Byte streams land in bump-allocated pages; a packed per-source offset
//! (page index in the high bits, index within the page in the low bits)
//! locates each stream. Lists larger than one page get a dedicated page of
//! their own.

use crate::collections::HugeLongArray;
use crate::core::compress::AdjacencyCompressor;
use crate::core::loading::LoadingResult;
use crate::types::adj_list::adjacency_properties::AdjacencyPropertiesBuilder;
use crate::types::adj_list::{AdjacencyCursor, AdjacencyProperties};
use crate::types::id_map::MappedNodeId;

/// log2 of the byte page size.
const PAGE_SHIFT: u32 = 18;
/// Byte page size (256 KiB).
const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
const PAGE_MASK: u64 = (PAGE_SIZE - 1) as u64;

/// Read-only compressed adjacency storage.
pub struct AdjacencyList {
    pages: Vec<Box<[u8]>>,
    offsets: HugeLongArray,
    degrees: HugeLongArray,
    relationship_count: usize,
}

impl AdjacencyList {
    /// Drains `compressor` into frozen adjacency storage, together with one
    /// [`AdjacencyProperties`] per property column.
    pub fn from_compressor(
        compressor: &AdjacencyCompressor,
        node_count: usize,
    ) -> LoadingResult<(AdjacencyList, Vec<AdjacencyProperties>)> {
        let mut list_builder = AdjacencyListBuilder::new(node_count);
        let mut property_builders: Vec<AdjacencyPropertiesBuilder> = (0..compressor
            .property_count())
            .map(|_| AdjacencyPropertiesBuilder::new(node_count))
            .collect();

        compressor.drain(|drained| {
            list_builder.add(drained.source, drained.bytes, drained.degree);
            for (column, builder) in property_builders.iter_mut().enumerate() {
                builder.add(drained.source, &drained.properties[column]);
            }
        })?;

        let list = list_builder.build();
        let properties = property_builders
            .into_iter()
            .map(|builder| builder.build())
            .collect();
        Ok((list, properties))
    }

    /// Neighbor count of a source; zero for sources without edges.
    pub fn degree(&self, source: MappedNodeId) -> usize {
        self.degrees.get(source as usize) as usize
    }

    /// Total number of stored relationships.
    pub fn relationship_count(&self) -> usize {
        self.relationship_count
    }

    /// Number of sources this list covers.
    pub fn node_count(&self) -> usize {
        self.degrees.size()
    }

    /// A cursor positioned at the start of `source`'s adjacency list.
    ///
    /// Callers that pool cursors reuse an existing one through
    /// [`AdjacencyCursor::copy_from`].
    pub fn adjacency_cursor(&self, source: MappedNodeId) -> AdjacencyCursor<'_> {
        let degree = self.degree(source);
        if degree == 0 {
            return AdjacencyCursor::empty();
        }
        AdjacencyCursor::new(self.bytes_for(source), degree)
    }

    fn bytes_for(&self, source: MappedNodeId) -> &[u8] {
        let offset = self.offsets.get(source as usize) as u64;
        let page = (offset >> PAGE_SHIFT) as usize;
        let index = (offset & PAGE_MASK) as usize;
        &self.pages[page][index..]
    }
}

/// Bump-allocating builder for [`AdjacencyList`].
///
/// `add` is called once per source, in any order; sources never seen keep
/// degree zero.
pub struct AdjacencyListBuilder {
    pages: Vec<Vec<u8>>,
    current_page: usize,
    offsets: HugeLongArray,
    degrees: HugeLongArray,
    relationship_count: usize,
}

impl AdjacencyListBuilder {
    pub fn new(node_count: usize) -> Self {
        Self {
            pages: vec![Vec::with_capacity(PAGE_SIZE)],
            current_page: 0,
            offsets: HugeLongArray::new(node_count),
            degrees: HugeLongArray::new(node_count),
            relationship_count: 0,
        }
    }

    /// Copies one source's packed bytes into the storage.
    pub fn add(&mut self, source: MappedNodeId, bytes: &[u8], degree: usize) {
        if degree == 0 {
            return;
        }

        let (page_index, in_page) = if bytes.len() > PAGE_SIZE {
            // Oversized list: dedicated page.
            self.pages.push(bytes.to_vec());
            (self.pages.len() - 1, 0)
        } else {
            if self.pages[self.current_page].len() + bytes.len() > PAGE_SIZE {
                self.pages.push(Vec::with_capacity(PAGE_SIZE));
                self.current_page = self.pages.len() - 1;
            }
            let page = &mut self.pages[self.current_page];
            let in_page = page.len();
            page.extend_from_slice(bytes);
            (self.current_page, in_page)
        };

        let offset = ((page_index as u64) << PAGE_SHIFT) | in_page as u64;
        self.offsets.set(source as usize, offset as i64);
        self.degrees.set(source as usize, degree as i64);
        self.relationship_count += degree;
    }

    /// Freezes into read-only storage.
    pub fn build(self) -> AdjacencyList {
        AdjacencyList {
            pages: self
                .pages
                .into_iter()
                .map(|page| page.into_boxed_slice())
                .collect(),
            offsets: self.offsets,
            degrees: self.degrees,
            relationship_count: self.relationship_count,
        }
    }
}
