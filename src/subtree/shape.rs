//! `Shape` — an immutable snapshot of a set of lattice cells.
//!
//! Shapes decouple the expensive, read-only work (enclosure check, writing the
//! grid file) from the live [`Subtree`](super::Subtree), which keeps mutating
//! on its own thread.

use crate::collections::VertexSet;
use crate::graph::{Dimensions, VertexId};

/// A set of cells within a bounding box.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Dimensions,
    cells: VertexSet,
}

impl Shape {
    /// An empty shape.
    pub fn empty(dims: Dimensions) -> Self {
        Self {
            dims,
            cells: VertexSet::new(dims.len()),
        }
    }

    /// A shape holding every cell of the box.
    pub fn solid(dims: Dimensions) -> Self {
        Self::from_cells(dims, 0..dims.len() as VertexId)
    }

    /// A shape holding `cells`.
    ///
    /// # Panics
    /// Panics if a cell is outside the box.
    pub fn from_cells(dims: Dimensions, cells: impl IntoIterator<Item = VertexId>) -> Self {
        let mut shape = Self::empty(dims);
        shape.cells.extend(cells);
        shape
    }

    /// Bounding box.
    #[inline]
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Number of cells in the shape.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the shape has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` if `v` is part of the shape.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.cells.contains(v)
    }

    /// Adds a cell. Returns `true` if it was new.
    pub fn insert(&mut self, v: VertexId) -> bool {
        self.cells.insert(v)
    }

    /// Removes a cell. Returns `true` if it was present.
    pub fn remove(&mut self, v: VertexId) -> bool {
        self.cells.remove(v)
    }

    /// Cells in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.cells.iter()
    }

    /// Returns `true` if some empty cell is sealed off from the outside.
    pub fn has_enclosed_space(&self) -> bool {
        super::enclosure::has_enclosed_space(self)
    }
}
