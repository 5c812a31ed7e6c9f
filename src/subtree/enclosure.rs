//! Enclosed-void detection for the plain cubic lattice.
//!
//! A multi-source breadth-first flood over *empty* cells, seeded with every
//! empty cell on the outer shell of the bounding box. Adjacency is the
//! geometric one from [`Dimensions::step`], so cells disabled by a starting
//! shape still count as open space. Any empty cell the flood never reaches is
//! part of a void.

use std::collections::VecDeque;

use crate::collections::VertexSet;
use crate::graph::{Dimensions, Direction, VertexId, EMPTY};

use super::Shape;

/// Empty cells reachable from outside the bounding box.
fn reachable_empty(shape: &Shape) -> VertexSet {
    let dims: Dimensions = shape.dims();
    let mut reached = VertexSet::new(dims.len());
    let mut queue = VecDeque::new();

    for v in 0..dims.len() as VertexId {
        if !shape.contains(v) && dims.on_shell(v) && reached.insert(v) {
            queue.push_back(v);
        }
    }

    while let Some(v) = queue.pop_front() {
        for d in Direction::ALL {
            let w = dims.step(v, d);
            if w != EMPTY && !shape.contains(w) && reached.insert(w) {
                queue.push_back(w);
            }
        }
    }

    reached
}

/// Returns `true` iff at least one empty cell cannot reach the outer shell
/// through other empty cells.
pub fn has_enclosed_space(shape: &Shape) -> bool {
    shape.len() + reachable_empty(shape).len() != shape.dims().len()
}

/// The empty cells sealed inside `shape`.
pub fn enclosed_cells(shape: &Shape) -> VertexSet {
    let dims = shape.dims();
    let reached = reachable_empty(shape);
    let mut sealed = VertexSet::new(dims.len());
    sealed.extend((0..dims.len() as VertexId).filter(|&v| !shape.contains(v) && !reached.contains(v)));
    sealed
}
