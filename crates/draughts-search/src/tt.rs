//! The transposition table (§4.G.4): a fixed-size, hash-verified cache of previously searched
//! positions, generalized from the teacher's `Entry`/`EntryMetadata` pair over `ChessMove` to one
//! over draughts' chain-capable [`Move`].

use draughts_core::{cache::CacheHash, Move, Position};

use crate::score::Score;

/// The number of buckets a freshly constructed transposition table carries, chosen so the whole
/// table lands comfortably within a few MiB of entries (§4.G.1.1's `tt_size_mib` is advisory
/// sizing guidance for an embedder, not a runtime-configurable bucket count — the table is a
/// compile-time-sized `Cache` like the teacher's, not a `Vec` resized per `Engine::new` call).
pub const TT_SIZE: usize = 1 << 20;

/// Which side of the true score a stored entry bounds, per the fail-hard alpha-beta convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub depth: u8,
    pub score: Score,
    pub bound: Bound,
    pub pv_move: Option<Move>,
}

struct Key(u64);

impl CacheHash for Key {
    fn hash(&self) -> u64 {
        self.0
    }
}

/// A fixed-size transposition table keyed by a position's Zobrist hash. Replacement policy:
/// prefer the deeper search, per §4.G.4; a shallower probe never overwrites a deeper one.
pub struct TranspositionTable {
    cache: draughts_core::cache::Cache<Entry, TT_SIZE>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        TranspositionTable {
            cache: draughts_core::cache::Cache::new(),
        }
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn probe(&self, position: &Position) -> Option<Entry> {
        self.cache.get(&Key(position.hash_key()))
    }

    pub fn store(&mut self, position: &Position, entry: Entry) {
        if let Some(existing) = self.probe(position) {
            if existing.depth > entry.depth {
                return;
            }
        }

        self.cache.insert(&Key(position.hash_key()), entry);
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}
