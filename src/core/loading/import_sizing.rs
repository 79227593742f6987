//! Page layout planning for paged huge arrays.
//!
//! Given a node count and a concurrency hint, picks a power-of-two page size
//! and a page count such that every thread gets a few pages to itself and
//! the page count stays addressable with a 32-bit index.

use crate::concurrency::Concurrency;
use crate::core::loading::{LoadingError, LoadingResult};
use crate::mem::BitUtil;

/// Smallest page size the planner will pick.
pub const MIN_PAGE_SIZE: usize = 1024;

/// Largest page size the planner will pick.
pub const MAX_PAGE_SIZE: usize = 1 << 30;

/// Target number of pages per worker thread.
pub const PAGES_PER_THREAD: usize = 4;

/// Page counts must stay addressable with a 32-bit index.
const MAX_PAGE_COUNT: usize = i32::MAX as usize;

/// A planned page layout: page count plus, when the node count was known,
/// the page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSizing {
    number_of_pages: usize,
    page_size: Option<usize>,
}

impl ImportSizing {
    /// Plans a layout for a known node count.
    ///
    /// The page size targets `node_count / (threads * PAGES_PER_THREAD)`,
    /// rounded down to a power of two and clamped to
    /// `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`. If the resulting page count does
    /// not fit a 32-bit index, the page size is doubled until it does or
    /// until `MAX_PAGE_SIZE` is reached, at which point planning fails.
    pub fn of(concurrency: Concurrency, node_count: usize) -> LoadingResult<ImportSizing> {
        let target_pages = concurrency.value() * PAGES_PER_THREAD;
        let mut page_size = BitUtil::ceil_div(node_count.max(1), target_pages);
        page_size = BitUtil::previous_power_of_two(page_size).clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);

        let mut number_of_pages = BitUtil::ceil_div(node_count, page_size);
        while number_of_pages > MAX_PAGE_COUNT && page_size < MAX_PAGE_SIZE {
            page_size = (page_size << 1).min(MAX_PAGE_SIZE);
            number_of_pages = BitUtil::ceil_div(node_count, page_size);
        }
        if number_of_pages > MAX_PAGE_COUNT {
            return Err(LoadingError::TooManyPages {
                nodes: node_count,
                pages: number_of_pages,
                page_size,
            });
        }

        log::trace!(
            "planned import layout: {} pages of {} elements for {} nodes",
            number_of_pages,
            page_size,
            node_count
        );
        Ok(ImportSizing {
            number_of_pages,
            page_size: Some(page_size),
        })
    }

    /// Plans a layout when the node count is not yet known.
    ///
    /// Targets `threads * PAGES_PER_THREAD` pages, rounded up to a power of
    /// two; the page size is decided later, when data arrives.
    pub fn of_unknown_node_count(concurrency: Concurrency) -> ImportSizing {
        let target_pages = concurrency.value() * PAGES_PER_THREAD;
        let number_of_pages =
            BitUtil::next_highest_power_of_two(target_pages).min(MAX_PAGE_COUNT);
        ImportSizing {
            number_of_pages,
            page_size: None,
        }
    }

    pub fn number_of_pages(&self) -> usize {
        self.number_of_pages
    }

    /// The planned page size; `None` when the node count was unknown.
    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    /// Total addressable capacity of the planned layout.
    pub fn capacity(&self) -> Option<usize> {
        self.page_size.map(|size| size * self.number_of_pages)
    }
}
