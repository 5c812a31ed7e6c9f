//! Collections used on the search hot path.
//!
//! - `frontier`: arena-backed candidate list with O(1) removal by id
//! - `vertex_set`: word-packed set of vertex ids

pub mod frontier;
pub mod vertex_set;

pub use frontier::Frontier;
pub use vertex_set::VertexSet;
