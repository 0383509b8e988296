//! A small generic fixed-size, hash-verified cache — the scaffold the transposition table in
//! `draughts-search` is built on (§4.G.4).

/// Anything that can report a 64-bit hash of itself, for use as a [`Cache`] key.
pub trait CacheHash {
    fn hash(&self) -> u64;
}

#[derive(Clone, Copy)]
struct Entry<T> {
    value: T,
    hash: u64,
}

/// A fixed-size, modulo-indexed cache of `N` entries. A lookup verifies the full stored hash
/// before returning a hit, so a bucket collision is always treated as a miss rather than returning
/// a wrong value (§7's "best-effort" TT policy).
#[derive(Clone)]
pub struct Cache<T: Clone, const N: usize> {
    data: Vec<Option<Entry<T>>>,
}

impl<T: Clone, const N: usize> Cache<T, N> {
    pub fn new() -> Self {
        Self {
            data: vec![None; N],
        }
    }

    pub fn insert<K: CacheHash>(&mut self, key: &K, value: T) {
        let hash = key.hash();

        self.data[hash as usize % N] = Some(Entry { value, hash });
    }

    pub fn get<K: CacheHash>(&self, key: &K) -> Option<T> {
        let hash = key.hash();
        let entry = &self.data[hash as usize % self.data.len()];

        entry.as_ref().and_then(|entry| {
            if entry.hash == hash {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    /// Clears every entry, as required at the start of every `get_best_move` call (§4.G.4).
    pub fn clear(&mut self) {
        self.data.fill(None);
    }
}

impl<T: Clone, const N: usize> Default for Cache<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
