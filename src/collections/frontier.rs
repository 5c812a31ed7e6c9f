//! `Frontier` — the candidate ("border") list of a search branch.
//!
//! A doubly linked list of vertex ids stored in a per-list arena, with a side
//! table from vertex id to arena slot. Every operation the search performs is
//! O(1): push at either end, pop from the front, and removal of an arbitrary id
//! without scanning.
//!
//! # Optimization
//! The list is created, cloned and swapped at every search depth, so it never
//! returns memory to the allocator:
//! - `links`: the arena. Retired slots become `LinkSlot::Free` and are chained
//!   through `free_head`; `alloc` pops that chain before growing the arena.
//! - `slot_of`: indexed by vertex id, holds the arena slot or `NIL`. It grows
//!   lazily to the largest id seen and is then reused as-is.
//!
//! Each list owns its arena, so concurrently live lists share nothing.

use core::fmt;
use core::iter::FusedIterator;

use crate::graph::{VertexId, EMPTY};

/// Null link / absent slot.
const NIL: u32 = u32::MAX;

/// A slot in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkSlot {
    Occupied { vertex: VertexId, prev: u32, next: u32 },
    Free(u32), // Next free slot index
}

/// An ordered set of vertex ids with O(1) removal by identity.
#[derive(Clone)]
pub struct Frontier {
    links: Vec<LinkSlot>,
    slot_of: Vec<u32>,
    head: u32,
    tail: u32,
    free_head: u32,
    len: usize,
}

impl Frontier {
    /// Creates an empty list. The side table grows on first use.
    pub fn new() -> Self {
        Self {
            links: Vec::new(),
            slot_of: Vec::new(),
            head: NIL,
            tail: NIL,
            free_head: NIL,
            len: 0,
        }
    }

    /// Creates an empty list sized for ids `0..universe`, so pushes never
    /// allocate.
    pub fn with_universe(universe: usize) -> Self {
        Self {
            links: Vec::with_capacity(universe),
            slot_of: vec![NIL; universe],
            ..Self::new()
        }
    }

    /// Number of ids in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `v` is in the list.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.slot_of
            .get(v as usize)
            .map_or(false, |&slot| slot != NIL)
    }

    /// Removes every id, keeping the arena for reuse.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Allocates an arena slot for `vertex`, reusing a retired one if possible.
    fn alloc(&mut self, vertex: VertexId, prev: u32, next: u32) -> u32 {
        let slot = LinkSlot::Occupied { vertex, prev, next };
        if self.free_head != NIL {
            let idx = self.free_head;
            self.free_head = match self.links[idx as usize] {
                LinkSlot::Free(next_free) => next_free,
                LinkSlot::Occupied { .. } => panic!("Corrupted free list"),
            };
            self.links[idx as usize] = slot;
            idx
        } else {
            let idx = self.links.len() as u32;
            self.links.push(slot);
            idx
        }
    }

    /// Returns a slot to the free chain.
    ///
    /// Caller must unlink it first.
    #[inline]
    fn free(&mut self, idx: u32) {
        self.links[idx as usize] = LinkSlot::Free(self.free_head);
        self.free_head = idx;
    }

    /// Records `vertex -> slot` in the side table, growing it if needed.
    ///
    /// # Panics
    /// Panics if `vertex` is already present.
    #[inline]
    fn index(&mut self, vertex: VertexId, slot: u32) {
        let v = vertex as usize;
        if v >= self.slot_of.len() {
            self.slot_of.resize(v + 1, NIL);
        }
        assert!(
            self.slot_of[v] == NIL,
            "vertex {vertex} pushed onto a frontier that already holds it"
        );
        self.slot_of[v] = slot;
    }

    #[inline]
    fn set_prev(&mut self, idx: u32, to: u32) {
        if let LinkSlot::Occupied { prev, .. } = &mut self.links[idx as usize] {
            *prev = to;
        }
    }

    #[inline]
    fn set_next(&mut self, idx: u32, to: u32) {
        if let LinkSlot::Occupied { next, .. } = &mut self.links[idx as usize] {
            *next = to;
        }
    }

    /// Pushes `v` to the front.
    ///
    /// # Panics
    /// Panics if `v` is already present.
    pub fn push_front(&mut self, v: VertexId) {
        let old_head = self.head;
        let idx = self.alloc(v, NIL, old_head);
        self.index(v, idx);

        if old_head != NIL {
            self.set_prev(old_head, idx);
        } else {
            self.tail = idx;
        }
        self.head = idx;
        self.len += 1;
    }

    /// Pushes `v` to the back.
    ///
    /// # Panics
    /// Panics if `v` is already present.
    pub fn push_back(&mut self, v: VertexId) {
        let old_tail = self.tail;
        let idx = self.alloc(v, old_tail, NIL);
        self.index(v, idx);

        if old_tail != NIL {
            self.set_next(old_tail, idx);
        } else {
            self.head = idx;
        }
        self.tail = idx;
        self.len += 1;
    }

    /// Inserts `v` directly before `next`, or at the back if `next` is
    /// [`EMPTY`]. Undoes a [`remove`](Self::remove) given the id that followed
    /// the removed one.
    ///
    /// # Panics
    /// Panics if `v` is already present or `next` is neither present nor
    /// [`EMPTY`].
    pub fn insert_before(&mut self, v: VertexId, next: VertexId) {
        if next == EMPTY {
            self.push_back(v);
            return;
        }
        let next_idx = match self.slot_of.get(next as usize) {
            Some(&idx) if idx != NIL => idx,
            _ => panic!("insert of {v} before {next}, which is not in the frontier"),
        };
        let prev_idx = match self.links[next_idx as usize] {
            LinkSlot::Occupied { prev, .. } => prev,
            LinkSlot::Free(_) => panic!("Corrupted list: index points to free slot"),
        };

        let idx = self.alloc(v, prev_idx, next_idx);
        self.index(v, idx);
        self.set_prev(next_idx, idx);
        if prev_idx != NIL {
            self.set_next(prev_idx, idx);
        } else {
            self.head = idx;
        }
        self.len += 1;
    }

    /// The id after `v`, or `None` if `v` is last or absent.
    pub fn successor(&self, v: VertexId) -> Option<VertexId> {
        let idx = *self.slot_of.get(v as usize)?;
        if idx == NIL {
            return None;
        }
        match self.links[idx as usize] {
            LinkSlot::Occupied { next, .. } if next != NIL => match self.links[next as usize] {
                LinkSlot::Occupied { vertex, .. } => Some(vertex),
                LinkSlot::Free(_) => panic!("Corrupted list: link points to free slot"),
            },
            LinkSlot::Occupied { .. } => None,
            LinkSlot::Free(_) => panic!("Corrupted list: index points to free slot"),
        }
    }

    /// Removes and returns the front id, or `None` if the list is empty.
    pub fn pop_front(&mut self) -> Option<VertexId> {
        if self.head == NIL {
            return None;
        }
        let v = match self.links[self.head as usize] {
            LinkSlot::Occupied { vertex, .. } => vertex,
            LinkSlot::Free(_) => panic!("Corrupted list: head points to free slot"),
        };
        self.unlink(v);
        Some(v)
    }

    /// Removes `v` if present, without scanning. Returns whether it was there.
    pub fn remove(&mut self, v: VertexId) -> bool {
        if !self.contains(v) {
            return false;
        }
        self.unlink(v);
        true
    }

    /// Detaches the slot holding `v` (which must be present) and frees it.
    fn unlink(&mut self, v: VertexId) {
        let idx = std::mem::replace(&mut self.slot_of[v as usize], NIL);
        let (prev, next) = match self.links[idx as usize] {
            LinkSlot::Occupied { prev, next, .. } => (prev, next),
            LinkSlot::Free(_) => panic!("Corrupted list: index points to free slot"),
        };

        if prev != NIL {
            self.set_next(prev, next);
        } else {
            self.head = next;
        }
        if next != NIL {
            self.set_prev(next, prev);
        } else {
            self.tail = prev;
        }

        self.free(idx);
        self.len -= 1;
    }

    /// Returns the front id without removing it.
    pub fn front(&self) -> Option<VertexId> {
        self.iter().next()
    }

    /// Iterates front to back.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            current: self.head,
            remaining: self.len,
        }
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Frontier {
    /// Two lists are equal when they hold the same ids in the same order,
    /// regardless of arena layout.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for Frontier {}

impl fmt::Debug for Frontier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Extend<VertexId> for Frontier {
    /// Appends at the back, preserving iteration order.
    fn extend<I: IntoIterator<Item = VertexId>>(&mut self, iter: I) {
        for v in iter {
            self.push_back(v);
        }
    }
}

impl FromIterator<VertexId> for Frontier {
    fn from_iter<I: IntoIterator<Item = VertexId>>(iter: I) -> Self {
        let mut list = Frontier::new();
        list.extend(iter);
        list
    }
}

impl<'a> IntoIterator for &'a Frontier {
    type Item = VertexId;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Front-to-back iterator over a [`Frontier`].
pub struct Iter<'a> {
    list: &'a Frontier,
    current: u32,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NIL {
            return None;
        }
        match self.list.links[self.current as usize] {
            LinkSlot::Occupied { vertex, next, .. } => {
                self.current = next;
                self.remaining -= 1;
                Some(vertex)
            }
            LinkSlot::Free(_) => panic!("Corrupted list: link points to free slot"),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}
