//! Transposition cache.
//!
//! Maps a board's Zobrist hash to the result of an earlier search of that
//! board. Hash collisions are accepted: two boards with the same hash share
//! an entry.

use std::collections::{HashMap, VecDeque};

use tracing::trace;
use xiangqi_core::Move;

/// How a stored score relates to the true value of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is exact.
    Exact,
    /// The true value is at least the score (fail high).
    LowerBound,
    /// The true value is at most the score (fail low).
    UpperBound,
}

/// A cached search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub hash: u64,
    pub depth: u32,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

/// Bounded hash-keyed cache of search results.
///
/// Evicts in insertion order, so identical searches evict identically.
#[derive(Debug)]
pub struct TranspositionTable {
    entries: HashMap<u64, TtEntry>,
    /// Hashes in insertion order, oldest first.
    order: VecDeque<u64>,
    capacity: usize,
}

impl TranspositionTable {
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        TranspositionTable {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores an entry, replacing any entry with the same hash.
    ///
    /// When the cache is full, the oldest quarter of its entries (at least
    /// one) is evicted first. Replacing an entry keeps its age.
    pub fn store(&mut self, entry: TtEntry) {
        if let Some(existing) = self.entries.get_mut(&entry.hash) {
            *existing = entry;
            return;
        }
        if self.entries.len() >= self.capacity {
            self.evict((self.capacity / 4).max(1));
        }
        self.entries.insert(entry.hash, entry);
        self.order.push_back(entry.hash);
    }

    /// Looks up the entry for `hash`.
    pub fn probe(&self, hash: u64) -> Option<TtEntry> {
        self.entries.get(&hash).copied()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn evict(&mut self, count: usize) {
        let count = count.min(self.order.len());
        for hash in self.order.drain(..count) {
            self.entries.remove(&hash);
        }
        trace!(
            evicted = count,
            remaining = self.entries.len(),
            "transposition cache eviction"
        );
    }
}
