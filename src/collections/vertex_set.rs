//! `VertexSet` — a fixed-capacity bit set over vertex ids.
//!
//! Bits are packed into `u64` words. Used for shape snapshots and for the
//! visited labels of the enclosure traversal, where a `Vec<bool>` would be
//! eight times larger.

use crate::graph::VertexId;

/// A fixed-capacity set of vertex ids `0..capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexSet {
    words: Vec<u64>,
    capacity: usize,
    /// Number of set bits.
    len: usize,
}

impl VertexSet {
    /// Creates an empty set able to hold ids `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
            capacity,
            len: 0,
        }
    }

    /// Number of ids the set can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of set bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds `v`. Returns `true` if it was not already present.
    ///
    /// # Panics
    /// Panics if `v >= capacity`.
    #[inline]
    pub fn insert(&mut self, v: VertexId) -> bool {
        assert!((v as usize) < self.capacity, "vertex {v} out of range");
        let word = &mut self.words[v as usize / 64];
        let mask = 1u64 << (v % 64);
        if *word & mask == 0 {
            *word |= mask;
            self.len += 1;
            true
        } else {
            false
        }
    }

    /// Removes `v`. Returns `true` if it was present.
    #[inline]
    pub fn remove(&mut self, v: VertexId) -> bool {
        let Some(word) = self.words.get_mut(v as usize / 64) else {
            return false;
        };
        let mask = 1u64 << (v % 64);
        if *word & mask != 0 {
            *word &= !mask;
            self.len -= 1;
            true
        } else {
            false
        }
    }

    /// Returns `true` if `v` is in the set. Out-of-range ids are never present.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.words
            .get(v as usize / 64)
            .map_or(false, |w| w & (1u64 << (v % 64)) != 0)
    }

    /// Iterates set ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let base = (i * 64) as VertexId;
            let mut bits = word;
            core::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros();
                bits &= bits - 1;
                Some(base + tz)
            })
        })
    }
}

impl Extend<VertexId> for VertexSet {
    fn extend<I: IntoIterator<Item = VertexId>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}
