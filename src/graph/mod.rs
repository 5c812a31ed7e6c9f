//! The lattice graph the search runs over.
//!
//! Only the plain cubic topology is provided: every cell is joined to its six
//! face neighbours. The enclosure checker in [`crate::subtree::enclosure`]
//! assumes exactly this topology.

pub mod lattice;

pub use lattice::{Axis, Dimensions, Direction, Lattice, VertexId, EMPTY};
