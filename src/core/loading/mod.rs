//! Concurrent graph loading.
//!
//! Producers stream nodes and labels into [`NodesBuilder`]; finalize turns
//! the accumulated state into an [`ArrayIdMap`] with frozen label
//! information. Page layouts for the paged structures come from
//! [`ImportSizing`].
//!
//! [`ArrayIdMap`]: crate::types::id_map::ArrayIdMap

pub mod array_id_map_builder;
pub mod import_sizing;
pub mod label_information;
pub mod nodes_builder;
pub mod sharded_id_map;

pub use array_id_map_builder::{ArrayIdMapBuilder, IdMapAllocator};
pub use import_sizing::{ImportSizing, MAX_PAGE_SIZE, MIN_PAGE_SIZE, PAGES_PER_THREAD};
pub use label_information::{
    LabelInformation, LabelInformationBuilder, MultiLabelInformation, SingleLabelInformation,
};
pub use nodes_builder::{BuiltNodes, NodesBuilder};
pub use sharded_id_map::ShardedIdMapBuilder;

/// Error type for load-time operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadingError {
    #[error("Original node id {id} is negative; ids must be non-negative")]
    NegativeId { id: i64 },

    #[error(
        "Importing {nodes} nodes would need {pages} pages of {page_size} elements each, \
         which exceeds the supported page count"
    )]
    TooManyPages {
        nodes: usize,
        pages: usize,
        page_size: usize,
    },

    #[error("Unknown node labels {missing:?}; available labels are {available:?}")]
    UnknownLabels {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error(
        "Adjacency buffer at position {position} cannot grow to {required} bytes; \
         the maximum buffer size was exceeded"
    )]
    BufferOverflow { position: usize, required: usize },
}

pub type LoadingResult<T> = Result<T, LoadingError>;
