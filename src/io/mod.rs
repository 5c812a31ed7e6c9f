//! Reading starting shapes and publishing results.

pub mod grid;
pub mod publish;

pub use grid::{format_shape, parse_shape, read_shape, write_shape};
pub use publish::{Discard, MemoryPublisher, Publisher, ShapeFile};
