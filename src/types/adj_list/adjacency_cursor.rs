//! Block-decoding cursor over one compressed adjacency list.
//!
//! The hottest path in the crate. Targets decompress in blocks of
//! [`BLOCK_SIZE`]; each fresh block continues delta decoding from the last
//! value of the previous one. Skip-ahead operations first test the last
//! value of the current block and drop whole blocks without touching their
//! elements, then binary-search inside the block that straddles the target.
//!
//! The API is tight: `next` and `peek` past exhaustion are caller bugs and
//! only guarded in debug builds. Cursors allocate nothing after
//! construction and are meant to be pooled via [`AdjacencyCursor::copy_from`].

use crate::collections::ArrayUtil;
use crate::core::compress::vlong::{decode_vlong, unzigzag};
use crate::types::adj_list::BLOCK_SIZE;
use crate::types::id_map::NOT_FOUND;

/// Decompressing cursor over a single source's targets.
///
/// Borrows the compressed bytes from the owning
/// [`AdjacencyList`](crate::types::adj_list::AdjacencyList); a cursor never
/// outlives its graph.
#[derive(Clone)]
pub struct AdjacencyCursor<'a> {
    bytes: &'a [u8],
    read_offset: usize,
    block: [i64; BLOCK_SIZE],
    /// Next index to consume within the block.
    pos: usize,
    /// Number of valid entries in the block.
    limit: usize,
    /// Targets not yet decoded into any block.
    undecoded: usize,
    /// Delta base for the next block.
    last_decoded: i64,
}

static NO_BYTES: [u8; 0] = [];

impl<'a> AdjacencyCursor<'a> {
    /// Creates a cursor over `degree` targets encoded at the start of
    /// `bytes`.
    pub fn new(bytes: &'a [u8], degree: usize) -> Self {
        Self {
            bytes,
            read_offset: 0,
            block: [0; BLOCK_SIZE],
            pos: 0,
            limit: 0,
            undecoded: degree,
            last_decoded: 0,
        }
    }

    /// A cursor over nothing; `remaining` is zero from the start.
    pub fn empty() -> Self {
        Self::new(&NO_BYTES, 0)
    }

    /// Repositions this cursor at the start of another compressed list,
    /// keeping the allocation-free reuse contract.
    pub fn reinit(&mut self, bytes: &'a [u8], degree: usize) {
        self.bytes = bytes;
        self.read_offset = 0;
        self.pos = 0;
        self.limit = 0;
        self.undecoded = degree;
        self.last_decoded = 0;
    }

    /// Replaces this cursor's state wholesale with another cursor's, for
    /// pooled reuse.
    pub fn copy_from(&mut self, other: &AdjacencyCursor<'a>) {
        self.clone_from(other);
    }

    /// Number of targets not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        (self.limit - self.pos) + self.undecoded
    }

    /// The next target.
    ///
    /// Calling this with `remaining() == 0` is undefined behavior; debug
    /// builds assert.
    #[inline]
    pub fn next(&mut self) -> i64 {
        debug_assert!(self.remaining() > 0, "cursor exhausted");
        if self.pos == self.limit {
            self.decode_next_block();
        }
        let value = self.block[self.pos];
        self.pos += 1;
        value
    }

    /// The value `next` would return, without advancing.
    ///
    /// Same precondition as [`next`](Self::next).
    #[inline]
    pub fn peek(&mut self) -> i64 {
        debug_assert!(self.remaining() > 0, "cursor exhausted");
        if self.pos == self.limit {
            self.decode_next_block();
        }
        self.block[self.pos]
    }

    /// Advances to the first target **strictly greater than** `target`.
    ///
    /// Returns the target and the number of targets consumed by this call,
    /// the returned one included. Exhausting the list returns
    /// ([`NOT_FOUND`], all remaining).
    pub fn skip_until(&mut self, target: i64) -> (i64, usize) {
        let before = self.remaining();
        loop {
            if self.pos == self.limit {
                if self.undecoded == 0 {
                    return (NOT_FOUND, before);
                }
                self.decode_next_block();
            }
            if self.block[self.limit - 1] <= target {
                // Entire block is at or below the target: drop it whole.
                self.pos = self.limit;
                continue;
            }
            let index = ArrayUtil::first_index_after(&self.block, self.pos, self.limit, target);
            self.pos = index + 1;
            return (self.block[index], before - self.remaining());
        }
    }

    /// Advances to the first target **greater than or equal to** `target`.
    ///
    /// Same return contract as [`skip_until`](Self::skip_until).
    pub fn advance(&mut self, target: i64) -> (i64, usize) {
        let before = self.remaining();
        loop {
            if self.pos == self.limit {
                if self.undecoded == 0 {
                    return (NOT_FOUND, before);
                }
                self.decode_next_block();
            }
            if self.block[self.limit - 1] < target {
                self.pos = self.limit;
                continue;
            }
            let index = ArrayUtil::first_index_of(&self.block, self.pos, self.limit, target);
            self.pos = index + 1;
            return (self.block[index], before - self.remaining());
        }
    }

    /// Advances over `k` targets and returns the one at relative index `k`,
    /// decoding through intervening blocks.
    ///
    /// `k` must be less than `remaining()`; debug builds assert.
    pub fn advance_by(&mut self, k: usize) -> (i64, usize) {
        let before = self.remaining();
        debug_assert!(k < before, "advance_by past the end");
        let mut k = k;
        loop {
            if self.pos == self.limit {
                self.decode_next_block();
            }
            let available = self.limit - self.pos;
            if k < available {
                self.pos += k;
                let value = self.block[self.pos];
                self.pos += 1;
                return (value, before - self.remaining());
            }
            k -= available;
            self.pos = self.limit;
        }
    }

    /// Decodes up to [`BLOCK_SIZE`] targets, continuing the delta chain from
    /// the last value of the previous block.
    fn decode_next_block(&mut self) {
        debug_assert!(self.undecoded > 0, "no targets left to decode");
        let count = BLOCK_SIZE.min(self.undecoded);
        let mut value = self.last_decoded;
        let mut offset = self.read_offset;
        for slot in self.block.iter_mut().take(count) {
            let (encoded, next_offset) = decode_vlong(self.bytes, offset);
            value += unzigzag(encoded);
            *slot = value;
            offset = next_offset;
        }
        self.read_offset = offset;
        self.last_decoded = value;
        self.limit = count;
        self.pos = 0;
        self.undecoded -= count;
    }
}
